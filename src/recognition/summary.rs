use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{RecognitionError, Result};
use crate::invoice::NormalizedInvoice;

/// Recognized and deferred amounts for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedRevenue {
    pub date: String,
    pub recognized_amount: i64,
    pub deferred_amount: i64,
    /// Last invoice that touched this day.
    pub invoice_id: String,
    pub customer_id: String,
    /// Every invoice that touched this day, in first-contribution order.
    pub contributors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month: String,
    pub recognized: i64,
    pub deferred: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionSummary {
    pub total_recognized: i64,
    pub total_deferred: i64,
    pub daily_breakdown: Vec<RecognizedRevenue>,
    pub monthly_breakdown: Vec<MonthlyRevenue>,
}

/// Per-day accumulator used while walking invoices. Sums are `i128` and
/// narrowed back to `i64` once the pass is complete.
#[derive(Debug, Default)]
pub(crate) struct DayBucket {
    recognized: i128,
    deferred: i128,
    invoice_id: String,
    customer_id: String,
    contributors: Vec<String>,
}

impl DayBucket {
    pub(crate) fn add(&mut self, invoice: &NormalizedInvoice, amount: i64, recognized: bool) {
        if recognized {
            self.recognized += i128::from(amount);
        } else {
            self.deferred += i128::from(amount);
        }
        self.invoice_id.clone_from(&invoice.id);
        self.customer_id.clone_from(&invoice.customer_id);
        if !self.contributors.contains(&invoice.id) {
            self.contributors.push(invoice.id.clone());
        }
    }
}

impl RecognitionSummary {
    pub(crate) fn from_days(days: BTreeMap<NaiveDate, DayBucket>) -> Result<Self> {
        let mut daily_breakdown = Vec::with_capacity(days.len());
        let mut total_recognized = 0i128;
        let mut total_deferred = 0i128;

        for (date, bucket) in days {
            let date = date.format("%Y-%m-%d").to_string();
            total_recognized += bucket.recognized;
            total_deferred += bucket.deferred;
            daily_breakdown.push(RecognizedRevenue {
                recognized_amount: RecognitionError::narrow(bucket.recognized, &date)?,
                deferred_amount: RecognitionError::narrow(bucket.deferred, &date)?,
                date,
                invoice_id: bucket.invoice_id,
                customer_id: bucket.customer_id,
                contributors: bucket.contributors,
            });
        }

        let monthly_breakdown = monthly_from_daily(&daily_breakdown)?;

        Ok(Self {
            total_recognized: RecognitionError::narrow(total_recognized, "totalRecognized")?,
            total_deferred: RecognitionError::narrow(total_deferred, "totalDeferred")?,
            daily_breakdown,
            monthly_breakdown,
        })
    }
}

/// Group daily rows by their `YYYY-MM` prefix, ascending by month.
pub fn monthly_from_daily(daily: &[RecognizedRevenue]) -> Result<Vec<MonthlyRevenue>> {
    let mut months: BTreeMap<&str, (i128, i128)> = BTreeMap::new();
    for day in daily {
        let month = day.date.get(..7).unwrap_or(&day.date);
        let entry = months.entry(month).or_default();
        entry.0 += i128::from(day.recognized_amount);
        entry.1 += i128::from(day.deferred_amount);
    }

    months
        .into_iter()
        .map(|(month, (recognized, deferred))| {
            Ok(MonthlyRevenue {
                month: month.to_string(),
                recognized: RecognitionError::narrow(recognized, month)?,
                deferred: RecognitionError::narrow(deferred, month)?,
            })
        })
        .collect()
}
