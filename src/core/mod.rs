pub mod assignment;
pub mod formatter;
pub mod history;
pub mod pipeline;
pub mod runner;

pub use crate::domain::model::{
    Assignment, ExchangeInput, ExchangeResult, FormattedPairing, Pairing, Participant,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
