pub mod dates;
mod normalized;

pub use normalized::{load_invoices, InvoiceStatus, NormalizedInvoice};
