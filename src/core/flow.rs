//! Order collection flow as an explicit state machine.
//!
//! Each step is a named transition that either advances the state and
//! records its input in the context, or fails and leaves both untouched.

use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

use super::currency::CurrencyCode;
use super::error::RateError;
use super::quote::{AmountMode, Quote, parse_amount};
use super::rate::RateResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Idle,
    ChooseGive,
    ChooseGet,
    ChooseAmountMode,
    EnterAmount,
    EnterFromLocation,
    EnterToLocation,
    WaitingForCalc,
    EnterContact,
    WaitingForSubmit,
    Submitted,
}

impl Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FlowState::Idle => "idle",
                FlowState::ChooseGive => "choose_give",
                FlowState::ChooseGet => "choose_get",
                FlowState::ChooseAmountMode => "choose_amount_mode",
                FlowState::EnterAmount => "enter_amount",
                FlowState::EnterFromLocation => "enter_from_location",
                FlowState::EnterToLocation => "enter_to_location",
                FlowState::WaitingForCalc => "waiting_for_calc",
                FlowState::EnterContact => "enter_contact",
                FlowState::WaitingForSubmit => "waiting_for_submit",
                FlowState::Submitted => "submitted",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Cannot {step} in state {state}")]
    UnexpectedStep {
        state: FlowState,
        step: &'static str,
    },

    #[error("Give and get currencies must differ")]
    SameCurrency,

    #[error("Could not parse amount: {0:?}")]
    InvalidAmount(String),

    #[error("{field} must be at least 2 characters")]
    TextTooShort { field: &'static str },

    #[error("Missing {0} in exchange context")]
    Incomplete(&'static str),

    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Inputs collected so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeContext {
    pub give: Option<CurrencyCode>,
    pub get: Option<CurrencyCode>,
    pub mode: Option<AmountMode>,
    pub amount: Option<f64>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub quote: Option<Quote>,
    pub contact: Option<String>,
}

/// Everything an order handler needs once the flow is submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub from_location: String,
    pub to_location: String,
    pub contact: String,
    pub quote: Quote,
}

#[derive(Debug, Clone)]
pub struct ExchangeFlow {
    state: FlowState,
    context: ExchangeContext,
}

impl Default for ExchangeFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn required_text(text: &str, field: &'static str) -> Result<String, FlowError> {
    let trimmed = text.trim();
    if trimmed.chars().count() < 2 {
        return Err(FlowError::TextTooShort { field });
    }
    Ok(trimmed.to_string())
}

impl ExchangeFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            context: ExchangeContext::default(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn context(&self) -> &ExchangeContext {
        &self.context
    }

    fn require_state(&self, expected: FlowState, step: &'static str) -> Result<(), FlowError> {
        if self.state != expected {
            return Err(FlowError::UnexpectedStep {
                state: self.state,
                step,
            });
        }
        Ok(())
    }

    fn advance(&mut self, next: FlowState) {
        debug!(from = %self.state, to = %next, "Exchange flow transition");
        self.state = next;
    }

    /// Starts over from any state.
    pub fn start(&mut self) {
        self.context = ExchangeContext::default();
        self.advance(FlowState::ChooseGive);
    }

    pub fn reset(&mut self) {
        self.context = ExchangeContext::default();
        self.advance(FlowState::Idle);
    }

    pub fn choose_give(&mut self, code: CurrencyCode) -> Result<(), FlowError> {
        self.require_state(FlowState::ChooseGive, "choose give currency")?;
        self.context.give = Some(code);
        self.advance(FlowState::ChooseGet);
        Ok(())
    }

    pub fn choose_get(&mut self, code: CurrencyCode) -> Result<(), FlowError> {
        self.require_state(FlowState::ChooseGet, "choose get currency")?;
        if self.context.give == Some(code) {
            return Err(FlowError::SameCurrency);
        }
        self.context.get = Some(code);
        self.advance(FlowState::ChooseAmountMode);
        Ok(())
    }

    pub fn choose_mode(&mut self, mode: AmountMode) -> Result<(), FlowError> {
        self.require_state(FlowState::ChooseAmountMode, "choose amount mode")?;
        self.context.mode = Some(mode);
        self.advance(FlowState::EnterAmount);
        Ok(())
    }

    pub fn enter_amount(&mut self, text: &str) -> Result<f64, FlowError> {
        self.require_state(FlowState::EnterAmount, "enter amount")?;
        let amount =
            parse_amount(text).ok_or_else(|| FlowError::InvalidAmount(text.to_string()))?;
        self.context.amount = Some(amount);
        self.advance(FlowState::EnterFromLocation);
        Ok(amount)
    }

    pub fn enter_from_location(&mut self, text: &str) -> Result<(), FlowError> {
        self.require_state(FlowState::EnterFromLocation, "enter departure location")?;
        self.context.from_location = Some(required_text(text, "Departure location")?);
        self.advance(FlowState::EnterToLocation);
        Ok(())
    }

    pub fn enter_to_location(&mut self, text: &str) -> Result<(), FlowError> {
        self.require_state(FlowState::EnterToLocation, "enter destination location")?;
        self.context.to_location = Some(required_text(text, "Destination location")?);
        self.advance(FlowState::WaitingForCalc);
        Ok(())
    }

    /// Resolves the rate and stores the quote. A failed resolution leaves the
    /// flow waiting for another attempt.
    pub async fn calculate(&mut self, resolver: &dyn RateResolver) -> Result<&Quote, FlowError> {
        self.require_state(FlowState::WaitingForCalc, "calculate")?;
        let give = self.context.give.ok_or(FlowError::Incomplete("give currency"))?;
        let get = self.context.get.ok_or(FlowError::Incomplete("get currency"))?;
        let mode = self.context.mode.ok_or(FlowError::Incomplete("amount mode"))?;
        let amount = self.context.amount.ok_or(FlowError::Incomplete("amount"))?;

        let result = resolver.resolve(give, get).await?;
        let quote = Quote::new(give, get, mode, amount, &result);

        self.advance(FlowState::EnterContact);
        Ok(&*self.context.quote.insert(quote))
    }

    pub fn enter_contact(&mut self, text: &str) -> Result<(), FlowError> {
        self.require_state(FlowState::EnterContact, "enter contact")?;
        self.context.contact = Some(required_text(text, "Contact")?);
        self.advance(FlowState::WaitingForSubmit);
        Ok(())
    }

    pub fn submit(&mut self) -> Result<OrderSummary, FlowError> {
        self.require_state(FlowState::WaitingForSubmit, "submit")?;
        let context = &self.context;
        let summary = OrderSummary {
            from_location: context
                .from_location
                .clone()
                .ok_or(FlowError::Incomplete("departure location"))?,
            to_location: context
                .to_location
                .clone()
                .ok_or(FlowError::Incomplete("destination location"))?,
            contact: context
                .contact
                .clone()
                .ok_or(FlowError::Incomplete("contact"))?,
            quote: context
                .quote
                .clone()
                .ok_or(FlowError::Incomplete("quote"))?,
        };
        self.advance(FlowState::Submitted);
        Ok(summary)
    }
}
