pub mod binance;
pub mod cbr;
pub mod nbu;
#[cfg(test)]
pub(crate) mod testing;
pub mod util;

pub use binance::{BinanceProvider, BinanceSnapshot};
pub use cbr::{CbrProvider, CbrSnapshot};
pub use nbu::{NbuProvider, NbuSnapshot};
