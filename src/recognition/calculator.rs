use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::policy::{InvalidDatePolicy, NegativeAmountPolicy, RecognitionPolicy};
use super::summary::{DayBucket, RecognitionSummary};
use super::window::ReportWindow;
use crate::error::{RecognitionError, Result};
use crate::invoice::dates::{ceil_days, parse_instant};
use crate::invoice::NormalizedInvoice;

/// A parsed `[start, end)` service period.
#[derive(Debug, Clone, Copy)]
struct ServicePeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ServicePeriod {
    /// Length in days, partial days rounded up, never below one.
    fn days(&self) -> i64 {
        ceil_days(self.start, self.end).max(1)
    }

    fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    fn last_day(&self) -> NaiveDate {
        let offset = (self.days() - 1) as u64;
        self.first_day()
            .checked_add_days(Days::new(offset))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Straight-line revenue recognition over a list of invoices.
///
/// Holds only its policy, so one value can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recognizer {
    policy: RecognitionPolicy,
}

impl Recognizer {
    pub fn new(policy: RecognitionPolicy) -> Self {
        Self { policy }
    }

    /// Day and month breakdown of recognized vs. deferred revenue.
    ///
    /// `from_date` defaults to the unbounded past and `to_date` to today (UTC).
    /// Both bounds are inclusive.
    pub fn calculate_recognition(
        &self,
        invoices: &[NormalizedInvoice],
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Result<RecognitionSummary> {
        let window = ReportWindow::parse(from_date, to_date)?;
        self.calculate_recognition_in(invoices, &window)
    }

    pub fn calculate_recognition_in(
        &self,
        invoices: &[NormalizedInvoice],
        window: &ReportWindow,
    ) -> Result<RecognitionSummary> {
        let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        let mut skipped = 0usize;

        for invoice in invoices {
            if !self.accepts_amount(invoice)? {
                skipped += 1;
                continue;
            }
            let Some(paid_on) = self.resolve_or_skip(invoice, |inv| self.recognition_day(inv))?
            else {
                skipped += 1;
                continue;
            };
            let Some(period) = self.resolve_or_skip(invoice, |inv| self.service_period(inv))?
            else {
                skipped += 1;
                continue;
            };

            match period {
                None => {
                    // Point-in-time charge: all of it on the payment day, or nothing.
                    if let Some(day) = paid_on.filter(|d| window.contains(*d)) {
                        days.entry(day)
                            .or_default()
                            .add(invoice, invoice.total_amount, true);
                    }
                }
                Some(period) => {
                    let daily_amount = self
                        .policy
                        .rounding
                        .divide(i128::from(invoice.total_amount), i128::from(period.days()));

                    let Some((first, last)) = window.clip(period.first_day(), period.last_day())
                    else {
                        continue;
                    };

                    for day in first.iter_days().take_while(|d| *d <= last) {
                        let recognized = paid_on.is_some_and(|paid| day >= paid);
                        days.entry(day)
                            .or_default()
                            .add(invoice, daily_amount, recognized);
                    }
                }
            }
        }

        let summary = RecognitionSummary::from_days(days)?;
        debug!(
            invoices = invoices.len(),
            skipped,
            from = ?window.from,
            to = %window.to,
            recognized = summary.total_recognized,
            deferred = summary.total_deferred,
            "calculated revenue recognition"
        );
        Ok(summary)
    }

    /// Deferred revenue outstanding at `as_of_date`: service not yet delivered,
    /// regardless of when (or whether) the invoice was paid.
    pub fn get_deferred_revenue_balance(
        &self,
        invoices: &[NormalizedInvoice],
        as_of_date: &str,
    ) -> Result<i64> {
        let as_of = parse_instant(as_of_date)
            .ok_or_else(|| RecognitionError::invalid_date("asOfDate", as_of_date))?;
        self.deferred_balance_at(invoices, as_of)
    }

    pub fn deferred_balance_at(
        &self,
        invoices: &[NormalizedInvoice],
        as_of: DateTime<Utc>,
    ) -> Result<i64> {
        let mut balance = 0i128;

        for invoice in invoices {
            if invoice.service_period().is_none() || invoice.status.is_written_off() {
                continue;
            }
            if !self.accepts_amount(invoice)? {
                continue;
            }
            let Some(Some(period)) = self.resolve_or_skip(invoice, |inv| self.service_period(inv))?
            else {
                continue;
            };

            balance += i128::from(self.deferred_portion(invoice.total_amount, &period, as_of));
        }
        let balance = RecognitionError::narrow(balance, "deferred balance")?;

        debug!(invoices = invoices.len(), %as_of, balance, "calculated deferred balance");
        Ok(balance)
    }

    fn deferred_portion(&self, total: i64, period: &ServicePeriod, as_of: DateTime<Utc>) -> i64 {
        if as_of < period.start {
            return total;
        }
        if as_of >= period.end {
            return 0;
        }

        let total_days = period.days();
        let elapsed = ceil_days(period.start, as_of).max(0);
        let remaining = (total_days - elapsed).max(0);

        self.policy.rounding.divide(
            i128::from(total) * i128::from(remaining),
            i128::from(total_days),
        )
    }

    /// Day from which a paid invoice counts as recognized. `None` if unpaid.
    /// A stray `paidAt` on an unpaid invoice is never read.
    fn recognition_day(&self, invoice: &NormalizedInvoice) -> Result<Option<NaiveDate>> {
        if !invoice.is_paid() {
            return Ok(None);
        }
        let Some(paid_at) = invoice.paid_at.as_deref() else {
            return Ok(None);
        };
        let instant = parse_instant(paid_at)
            .ok_or_else(|| RecognitionError::invalid_date("paidAt", paid_at))?;
        Ok(Some(instant.date_naive()))
    }

    fn service_period(&self, invoice: &NormalizedInvoice) -> Result<Option<ServicePeriod>> {
        let Some((start, end)) = invoice.service_period() else {
            return Ok(None);
        };
        let start = parse_instant(start)
            .ok_or_else(|| RecognitionError::invalid_date("periodStart", start))?;
        let end =
            parse_instant(end).ok_or_else(|| RecognitionError::invalid_date("periodEnd", end))?;
        Ok(Some(ServicePeriod { start, end }))
    }

    /// Apply the invalid-date policy to a date lookup: `Ok(None)` means skip.
    fn resolve_or_skip<T>(
        &self,
        invoice: &NormalizedInvoice,
        lookup: impl FnOnce(&NormalizedInvoice) -> Result<T>,
    ) -> Result<Option<T>> {
        match lookup(invoice) {
            Ok(value) => Ok(Some(value)),
            Err(err) => match self.policy.invalid_dates {
                InvalidDatePolicy::Reject => Err(err),
                InvalidDatePolicy::Skip => {
                    warn!(invoice = %invoice.id, error = %err, "skipping invoice");
                    Ok(None)
                }
            },
        }
    }

    fn accepts_amount(&self, invoice: &NormalizedInvoice) -> Result<bool> {
        if invoice.total_amount >= 0 {
            return Ok(true);
        }
        match self.policy.negative_amounts {
            NegativeAmountPolicy::PassThrough => Ok(true),
            NegativeAmountPolicy::Skip => {
                warn!(
                    invoice = %invoice.id,
                    amount = invoice.total_amount,
                    "skipping invoice with negative total"
                );
                Ok(false)
            }
            NegativeAmountPolicy::Reject => Err(RecognitionError::NegativeAmount {
                invoice: invoice.id.clone(),
                amount: invoice.total_amount,
            }),
        }
    }
}
