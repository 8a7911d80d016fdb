//! Derived views over the ledger.
//!
//! Everything the dashboard, insights, progress and history views
//! compute from the loan list: monthly EMI load, lender concentration,
//! repayment progress against the loan term, a flattened payment
//! history and a short forward projection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;

use super::loan::{
    Loan, LoanId, Payment, PaymentStatus, percentage_of, saturating_sum, total_outstanding,
};
use super::schedule;

/// Outstanding balance owed to one lender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LenderShare {
    pub lender: String,
    pub amount: Decimal,
    pub percentage: f64,
}

/// Repayment progress of one loan compared with elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanProgress {
    pub paid_amount: Decimal,
    /// Share of the principal repaid, 0..=100.
    pub paid_percentage: f64,
    pub total_months: i32,
    pub months_elapsed: i32,
    /// Share of the term elapsed, clamped to 0..=100.
    pub time_percentage: f64,
    /// Repayment expected by now if paid evenly over the term.
    pub expected_percentage: f64,
    /// `paid_percentage - expected_percentage`.
    pub difference: f64,
    pub is_ahead: bool,
    /// EMIs left at the current EMI amount; `None` when the EMI is zero.
    pub remaining_payments: Option<u64>,
}

/// A payment with the loan it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEntry {
    pub payment: Payment,
    pub loan_id: LoanId,
    pub loan_name: String,
}

/// Projected EMI outflow for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyProjection {
    /// Abbreviated month name, e.g. `Jan`.
    pub month: String,
    pub amount: Decimal,
}

/// Sum of every loan's EMI.
pub fn total_monthly_emi(loans: &[Loan]) -> Decimal {
    saturating_sum(loans.iter().map(|loan| loan.emi_amount))
}

/// Outstanding balance per lender, largest first.
pub fn lender_distribution(loans: &[Loan]) -> Vec<LenderShare> {
    let total = total_outstanding(loans);
    if total.is_zero() {
        return Vec::new();
    }

    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for loan in loans {
        match groups.iter_mut().find(|(lender, _)| *lender == loan.lender) {
            Some((_, amount)) => *amount = amount.saturating_add(loan.remaining_amount),
            None => groups.push((loan.lender.clone(), loan.remaining_amount)),
        }
    }

    let mut shares: Vec<LenderShare> = groups
        .into_iter()
        .map(|(lender, amount)| LenderShare {
            percentage: percentage_of(amount, total),
            lender,
            amount,
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

/// Progress of `loan` as of `today`.
pub fn loan_progress(loan: &Loan, today: NaiveDate) -> LoanProgress {
    let paid_amount = loan.paid_amount();
    let paid_percentage = percentage_of(paid_amount, loan.total_amount);

    let total_months = schedule::months_between(loan.end_date, loan.start_date);
    let months_elapsed = schedule::months_between(today, loan.start_date);
    let time_percentage = if total_months <= 0 {
        100.0
    } else {
        (f64::from(months_elapsed) / f64::from(total_months) * 100.0).clamp(0.0, 100.0)
    };

    let expected_percentage = time_percentage;
    let difference = paid_percentage - expected_percentage;

    let remaining_payments = if loan.emi_amount > Decimal::ZERO {
        loan.remaining_amount
            .checked_div(loan.emi_amount)
            .and_then(|n| n.ceil().to_u64())
    } else {
        None
    };

    LoanProgress {
        paid_amount,
        paid_percentage,
        total_months,
        months_elapsed,
        time_percentage,
        expected_percentage,
        difference,
        is_ahead: difference > 0.0,
        remaining_payments,
    }
}

/// All payments, newest first, optionally narrowed to one loan and/or
/// one status.
pub fn payment_history(
    loans: &[Loan],
    loan_id: Option<&str>,
    status: Option<PaymentStatus>,
) -> Vec<PaymentEntry> {
    let mut entries: Vec<PaymentEntry> = loans
        .iter()
        .filter(|loan| loan_id.is_none_or(|id| loan.id == id))
        .flat_map(|loan| {
            loan.payment_history.iter().map(move |payment| PaymentEntry {
                payment: payment.clone(),
                loan_id: loan.id.clone(),
                loan_name: loan.name.clone(),
            })
        })
        .filter(|entry| status.is_none_or(|s| entry.payment.status == s))
        .collect();

    entries.sort_by(|a, b| b.payment.date.cmp(&a.payment.date));
    entries
}

/// EMI outflow for each of the next `months` months starting with the
/// current one.
pub fn monthly_projection(loans: &[Loan], today: NaiveDate, months: u32) -> Vec<MonthlyProjection> {
    let amount = total_monthly_emi(loans);
    (0..months)
        .filter_map(|offset| schedule::add_months(today, offset))
        .map(|month| MonthlyProjection {
            month: month.format("%b").to_string(),
            amount,
        })
        .collect()
}
