//! Accrual revenue recognition.
//!
//! Invoices with a service period are spread evenly across its days and each
//! day's slice is recognized once the invoice has been paid, deferred before
//! that. Invoices without a period are recognized in full on the payment day.

mod calculator;
mod policy;
mod summary;
mod window;

pub use calculator::Recognizer;
pub use policy::{InvalidDatePolicy, NegativeAmountPolicy, RecognitionPolicy, RoundingMode};
pub use summary::{monthly_from_daily, MonthlyRevenue, RecognitionSummary, RecognizedRevenue};
pub use window::ReportWindow;

use crate::error::Result;
use crate::invoice::NormalizedInvoice;

/// [`Recognizer::calculate_recognition`] with the default policy.
pub fn calculate_recognition(
    invoices: &[NormalizedInvoice],
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<RecognitionSummary> {
    Recognizer::default().calculate_recognition(invoices, from_date, to_date)
}

/// [`Recognizer::get_deferred_revenue_balance`] with the default policy.
pub fn get_deferred_revenue_balance(invoices: &[NormalizedInvoice], as_of_date: &str) -> Result<i64> {
    Recognizer::default().get_deferred_revenue_balance(invoices, as_of_date)
}
