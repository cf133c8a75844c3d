pub mod config;
pub mod error;
pub mod invoice;
pub mod recognition;

pub use config::{Config, DisplaySettings};
pub use error::{RecognitionError, Result};
pub use invoice::{load_invoices, InvoiceStatus, NormalizedInvoice};
pub use recognition::{
    calculate_recognition, get_deferred_revenue_balance, MonthlyRevenue, RecognitionPolicy,
    RecognitionSummary, RecognizedRevenue, Recognizer, ReportWindow,
};
