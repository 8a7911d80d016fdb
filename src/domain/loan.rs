//! Loan ledger domain types and arithmetic.
//!
//! Defines loans, their embedded payment history, and the pure
//! functions behind the ledger's read-side aggregates. Nothing here
//! touches storage; the `LoanLedger` use case owns persistence.
//!
//! The serde layout mirrors the persisted `"loans"` document: camelCase
//! field names, `type` for the loan category, amounts as JSON numbers
//! and dates as `YYYY-MM-DD`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::schedule;
use crate::error::LedgerError;

/// Identifier of a loan or payment record.
pub type LoanId = String;

// ────────────────────────────────────────────
// Enums
// ────────────────────────────────────────────

/// Loan category, used for grouping in the distribution view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Phone,
    Car,
    Property,
    Personal,
    Other,
}

impl LoanType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Car => "car",
            Self::Property => "property",
            Self::Personal => "personal",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for LoanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement state of a payment.
///
/// Only `Completed` is produced by the payment flow; the other states
/// exist so persisted data from elsewhere still parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

/// Channel a payment was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Bank,
    Upi,
    Wallet,
}

// ────────────────────────────────────────────
// Records
// ────────────────────────────────────────────

/// A single payment against a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: LoanId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
}

impl Payment {
    /// A settled payment on `date`.
    pub fn completed(id: LoanId, amount: Decimal, date: NaiveDate, method: PaymentMethod) -> Self {
        Self {
            id,
            amount,
            date,
            status: PaymentStatus::Completed,
            method: Some(method),
        }
    }
}

/// A tracked loan with its payment history (most recent first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub name: String,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,
    /// Annual interest rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub emi_amount: Decimal,
    pub next_payment_date: NaiveDate,
    #[serde(default)]
    pub payment_history: Vec<Payment>,
    pub lender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub is_manual: bool,
}

/// Fields supplied when adding a loan; id and history are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub name: String,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub emi_amount: Decimal,
    pub next_payment_date: NaiveDate,
    pub lender: String,
    #[serde(default)]
    pub account_number: Option<String>,
    pub is_manual: bool,
}

/// Partial loan update. `None` leaves the field untouched.
///
/// `account_number` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanUpdate {
    pub name: Option<String>,
    pub loan_type: Option<LoanType>,
    pub total_amount: Option<Decimal>,
    pub remaining_amount: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub emi_amount: Option<Decimal>,
    pub next_payment_date: Option<NaiveDate>,
    pub payment_history: Option<Vec<Payment>>,
    pub lender: Option<String>,
    pub account_number: Option<Option<String>>,
    pub is_manual: Option<bool>,
}

impl Loan {
    /// Builds a loan from user input with an empty payment history.
    pub fn from_new(id: LoanId, new: NewLoan) -> Self {
        Self {
            id,
            name: new.name,
            loan_type: new.loan_type,
            total_amount: new.total_amount,
            remaining_amount: new.remaining_amount,
            interest_rate: new.interest_rate,
            start_date: new.start_date,
            end_date: new.end_date,
            emi_amount: new.emi_amount,
            next_payment_date: new.next_payment_date,
            payment_history: Vec::new(),
            lender: new.lender,
            account_number: new.account_number,
            is_manual: new.is_manual,
        }
    }

    /// Shallow-merges `update` into this loan.
    pub fn apply_update(&mut self, update: LoanUpdate) {
        let LoanUpdate {
            name,
            loan_type,
            total_amount,
            remaining_amount,
            interest_rate,
            start_date,
            end_date,
            emi_amount,
            next_payment_date,
            payment_history,
            lender,
            account_number,
            is_manual,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = loan_type {
            self.loan_type = v;
        }
        if let Some(v) = total_amount {
            self.total_amount = v;
        }
        if let Some(v) = remaining_amount {
            self.remaining_amount = v;
        }
        if let Some(v) = interest_rate {
            self.interest_rate = v;
        }
        if let Some(v) = start_date {
            self.start_date = v;
        }
        if let Some(v) = end_date {
            self.end_date = v;
        }
        if let Some(v) = emi_amount {
            self.emi_amount = v;
        }
        if let Some(v) = next_payment_date {
            self.next_payment_date = v;
        }
        if let Some(v) = payment_history {
            self.payment_history = v;
        }
        if let Some(v) = lender {
            self.lender = v;
        }
        if let Some(v) = account_number {
            self.account_number = v;
        }
        if let Some(v) = is_manual {
            self.is_manual = v;
        }
    }

    /// Applies a payment: prepends it to the history, reduces the
    /// remaining balance (never below zero) and moves the due date one
    /// month past the previous due date.
    ///
    /// Overpayment is absorbed. The cadence is anchored to the due date,
    /// not the payment date, so paying early or late does not shift it.
    pub fn record_payment(&mut self, payment: Payment) -> Result<(), LedgerError> {
        let next_due = schedule::add_months(self.next_payment_date, 1)
            .ok_or(LedgerError::ScheduleOverflow(self.next_payment_date))?;

        self.remaining_amount = self
            .remaining_amount
            .saturating_sub(payment.amount)
            .max(Decimal::ZERO);
        self.next_payment_date = next_due;
        self.payment_history.insert(0, payment);
        Ok(())
    }

    /// Amount repaid so far (`total - remaining`).
    pub fn paid_amount(&self) -> Decimal {
        self.total_amount.saturating_sub(self.remaining_amount)
    }
}

// ────────────────────────────────────────────
// Aggregates
// ────────────────────────────────────────────

/// A loan due within the look-ahead window.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPayment {
    pub loan: Loan,
    pub days_left: i64,
}

/// Share of the outstanding balance held by one loan type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeShare {
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    pub percentage: f64,
}

/// Sum of `remaining_amount` across all loans, saturating at
/// `Decimal::MAX` / `Decimal::MIN`.
pub fn total_outstanding(loans: &[Loan]) -> Decimal {
    saturating_sum(loans.iter().map(|loan| loan.remaining_amount))
}

pub(crate) fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Rejects a loan list whose balances, EMIs or paid amounts do not fit
/// in a `Decimal`.
///
/// Mutations check this before persisting so the aggregates always see
/// exact sums.
pub fn check_amounts(loans: &[Loan]) -> Result<(), LedgerError> {
    let sums = |field: fn(&Loan) -> Decimal| {
        loans
            .iter()
            .try_fold(Decimal::ZERO, |acc, loan| acc.checked_add(field(loan)))
            .is_some()
    };
    let paid_fits = loans
        .iter()
        .all(|loan| loan.total_amount.checked_sub(loan.remaining_amount).is_some());

    if sums(|l| l.remaining_amount) && sums(|l| l.emi_amount) && paid_fits {
        Ok(())
    } else {
        Err(LedgerError::AmountOverflow)
    }
}

/// Loans due between today and `days` days from now, soonest first.
///
/// Overdue loans (negative `days_left`) are excluded. Ties keep ledger
/// order.
pub fn upcoming_payments(loans: &[Loan], today: NaiveDate, days: u32) -> Vec<UpcomingPayment> {
    let window = i64::from(days);
    let mut upcoming: Vec<UpcomingPayment> = loans
        .iter()
        .map(|loan| UpcomingPayment {
            days_left: schedule::days_until(loan.next_payment_date, today),
            loan: loan.clone(),
        })
        .filter(|entry| (0..=window).contains(&entry.days_left))
        .collect();

    upcoming.sort_by_key(|entry| entry.days_left);
    upcoming
}

/// Outstanding balance grouped by loan type, as percentages.
///
/// Groups appear in the order each type is first seen. Empty when
/// nothing is outstanding.
pub fn loan_distribution(loans: &[Loan]) -> Vec<TypeShare> {
    let total = total_outstanding(loans);
    if total.is_zero() {
        return Vec::new();
    }

    let mut groups: Vec<(LoanType, Decimal)> = Vec::new();
    for loan in loans {
        match groups.iter_mut().find(|(t, _)| *t == loan.loan_type) {
            Some((_, amount)) => *amount = amount.saturating_add(loan.remaining_amount),
            None => groups.push((loan.loan_type, loan.remaining_amount)),
        }
    }

    groups
        .into_iter()
        .map(|(loan_type, amount)| TypeShare {
            loan_type,
            percentage: percentage_of(amount, total),
        })
        .collect()
}

/// `part / whole * 100` as a float; zero when `whole` is zero.
///
/// Falls back to float division when the exact ratio overflows.
pub fn percentage_of(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or_else(|| {
            let (p, w) = (part.to_f64().unwrap_or(0.0), whole.to_f64().unwrap_or(1.0));
            p / w * 100.0
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn loan(id: &str, loan_type: LoanType, remaining: Decimal, next: NaiveDate) -> Loan {
        Loan {
            id: id.to_string(),
            name: format!("Loan {id}"),
            loan_type,
            total_amount: remaining * dec!(2),
            remaining_amount: remaining,
            interest_rate: dec!(10),
            start_date: date(2024, 1, 1),
            end_date: date(2029, 1, 1),
            emi_amount: dec!(5000),
            next_payment_date: next,
            payment_history: Vec::new(),
            lender: "Bank".to_string(),
            account_number: None,
            is_manual: true,
        }
    }

    #[test]
    fn test_record_payment_reduces_and_advances() {
        let mut l = loan("1", LoanType::Car, dec!(100000), date(2024, 2, 1));
        let payment = Payment::completed("9".into(), dec!(5000), date(2024, 1, 20), PaymentMethod::Upi);
        l.record_payment(payment.clone()).unwrap();

        assert_eq!(l.remaining_amount, dec!(95000));
        assert_eq!(l.next_payment_date, date(2024, 3, 1));
        assert_eq!(l.payment_history, vec![payment]);
    }

    #[test]
    fn test_record_payment_clamps_overpayment() {
        let mut l = loan("1", LoanType::Phone, dec!(3000), date(2024, 2, 1));
        l.record_payment(Payment::completed("9".into(), dec!(5000), date(2024, 2, 1), PaymentMethod::Bank))
            .unwrap();
        assert_eq!(l.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn test_record_payment_prepends() {
        let mut l = loan("1", LoanType::Phone, dec!(30000), date(2024, 1, 31));
        l.record_payment(Payment::completed("a".into(), dec!(100), date(2024, 1, 1), PaymentMethod::Bank))
            .unwrap();
        l.record_payment(Payment::completed("b".into(), dec!(100), date(2024, 1, 2), PaymentMethod::Bank))
            .unwrap();

        let ids: Vec<&str> = l.payment_history.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        // Jan 31 → Feb 29 → Mar 29: clamping carries forward.
        assert_eq!(l.next_payment_date, date(2024, 3, 29));
    }

    #[test]
    fn test_apply_update_is_shallow() {
        let mut l = loan("1", LoanType::Car, dec!(1000), date(2024, 2, 1));
        let before = l.clone();
        l.apply_update(LoanUpdate {
            name: Some("Renamed".into()),
            remaining_amount: Some(dec!(500)),
            ..LoanUpdate::default()
        });

        assert_eq!(l.name, "Renamed");
        assert_eq!(l.remaining_amount, dec!(500));
        assert_eq!(l.lender, before.lender);
        assert_eq!(l.total_amount, before.total_amount);
        assert_eq!(l.next_payment_date, before.next_payment_date);
    }

    #[test]
    fn test_total_outstanding() {
        let loans = vec![
            loan("1", LoanType::Car, dec!(100), date(2024, 2, 1)),
            loan("2", LoanType::Phone, dec!(250.5), date(2024, 2, 1)),
        ];
        assert_eq!(total_outstanding(&loans), dec!(350.5));
        assert_eq!(total_outstanding(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_upcoming_filters_and_sorts() {
        let today = date(2024, 1, 10);
        let loans = vec![
            loan("late", LoanType::Car, dec!(1), date(2024, 1, 9)),
            loan("five", LoanType::Car, dec!(1), date(2024, 1, 15)),
            loan("today", LoanType::Car, dec!(1), date(2024, 1, 10)),
            loan("far", LoanType::Car, dec!(1), date(2024, 1, 20)),
            loan("five-b", LoanType::Car, dec!(1), date(2024, 1, 15)),
        ];

        let upcoming = upcoming_payments(&loans, today, 7);
        let ids: Vec<(&str, i64)> = upcoming
            .iter()
            .map(|u| (u.loan.id.as_str(), u.days_left))
            .collect();
        assert_eq!(ids, vec![("today", 0), ("five", 5), ("five-b", 5)]);
    }

    #[test]
    fn test_upcoming_window_is_inclusive() {
        let today = date(2024, 1, 10);
        let loans = vec![loan("1", LoanType::Car, dec!(1), date(2024, 1, 17))];
        assert_eq!(upcoming_payments(&loans, today, 7).len(), 1);
        assert!(upcoming_payments(&loans, today, 6).is_empty());
    }

    #[test]
    fn test_distribution_first_encounter_order() {
        let next = date(2024, 2, 1);
        let loans = vec![
            loan("1", LoanType::Phone, dec!(100), next),
            loan("2", LoanType::Car, dec!(200), next),
            loan("3", LoanType::Phone, dec!(100), next),
        ];

        let dist = loan_distribution(&loans);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].loan_type, LoanType::Phone);
        assert!((dist[0].percentage - 50.0).abs() < 1e-9);
        assert_eq!(dist[1].loan_type, LoanType::Car);
        assert!((dist[1].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_update_can_clear_account_number() {
        let mut l = loan("1", LoanType::Car, dec!(1000), date(2024, 2, 1));
        l.account_number = Some("XXXX1234".into());

        l.apply_update(LoanUpdate::default());
        assert_eq!(l.account_number.as_deref(), Some("XXXX1234"));

        l.apply_update(LoanUpdate {
            account_number: Some(Some("XXXX9999".into())),
            ..LoanUpdate::default()
        });
        assert_eq!(l.account_number.as_deref(), Some("XXXX9999"));

        l.apply_update(LoanUpdate {
            account_number: Some(None),
            ..LoanUpdate::default()
        });
        assert_eq!(l.account_number, None);
    }

    #[test]
    fn test_huge_balances_do_not_panic() {
        let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let next = date(2024, 2, 1);
        let mut a = loan("1", LoanType::Car, Decimal::ZERO, next);
        a.remaining_amount = half;
        let mut b = loan("2", LoanType::Phone, Decimal::ZERO, next);
        b.remaining_amount = half;
        let loans = vec![a, b];

        assert_eq!(total_outstanding(&loans), Decimal::MAX);
        let dist = loan_distribution(&loans);
        assert_eq!(dist.len(), 2);
        assert!(dist.iter().all(|s| s.percentage.is_finite()));
    }

    #[test]
    fn test_check_amounts() {
        let next = date(2024, 2, 1);
        let mut fine = loan("1", LoanType::Car, dec!(1000), next);
        assert!(check_amounts(std::slice::from_ref(&fine)).is_ok());
        assert!(check_amounts(&[]).is_ok());

        let mut big = loan("2", LoanType::Car, Decimal::ZERO, next);
        big.remaining_amount = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let other = big.clone();
        assert!(matches!(
            check_amounts(&[big.clone(), other]),
            Err(LedgerError::AmountOverflow)
        ));

        fine.emi_amount = Decimal::MAX;
        big.remaining_amount = dec!(1);
        big.emi_amount = dec!(1);
        assert!(matches!(check_amounts(&[fine, big]), Err(LedgerError::AmountOverflow)));
    }

    #[test]
    fn test_check_amounts_rejects_unrepresentable_paid_amount() {
        let mut l = loan("1", LoanType::Car, dec!(1), date(2024, 2, 1));
        l.total_amount = Decimal::MAX;
        l.remaining_amount = -Decimal::ONE;
        assert!(matches!(check_amounts(&[l]), Err(LedgerError::AmountOverflow)));
    }

    #[test]
    fn test_percentage_of_extreme_ratio_is_finite() {
        let pct = percentage_of(Decimal::MAX, Decimal::new(1, 28));
        assert!(pct.is_finite() && pct > 0.0);
        assert!(percentage_of(dec!(1), Decimal::ZERO).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distribution_empty_when_nothing_outstanding() {
        let loans = vec![loan("1", LoanType::Car, Decimal::ZERO, date(2024, 2, 1))];
        assert!(loan_distribution(&loans).is_empty());
        assert!(loan_distribution(&[]).is_empty());
    }

    #[test]
    fn test_serde_layout() {
        let mut l = loan("1", LoanType::Property, dec!(95000), date(2024, 3, 1));
        l.account_number = Some("XXXX1234".into());
        l.payment_history.push(Payment::completed(
            "2".into(),
            dec!(5000),
            date(2024, 2, 1),
            PaymentMethod::Upi,
        ));

        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["type"], "property");
        assert_eq!(json["remainingAmount"], 95000.0);
        assert_eq!(json["nextPaymentDate"], "2024-03-01");
        assert_eq!(json["accountNumber"], "XXXX1234");
        assert_eq!(json["isManual"], true);
        assert_eq!(json["paymentHistory"][0]["status"], "completed");
        assert_eq!(json["paymentHistory"][0]["method"], "upi");

        let back: Loan = serde_json::from_value(json).unwrap();
        assert_eq!(back, l);
    }

    #[test]
    fn test_parses_integer_amounts() {
        let raw = r#"{
            "id": "1", "name": "iPhone", "type": "phone",
            "totalAmount": 80000, "remainingAmount": 60000, "interestRate": 12,
            "startDate": "2023-01-15", "endDate": "2024-01-15", "emiAmount": 7000,
            "nextPaymentDate": "2024-02-15", "paymentHistory": [],
            "lender": "HDFC Bank", "isManual": false
        }"#;
        let l: Loan = serde_json::from_str(raw).unwrap();
        assert_eq!(l.remaining_amount, dec!(60000));
        assert_eq!(l.account_number, None);
    }
}
