//! Demo ledger written on first start.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::loan::{Loan, LoanType, Payment, PaymentMethod};
use super::schedule;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn paid(id: &str, amount: rust_decimal::Decimal, date: NaiveDate, method: PaymentMethod) -> Payment {
    Payment::completed(id.to_string(), amount, date, method)
}

/// Three sample loans (phone, car, home) due one month after `today`.
pub fn demo_loans(today: NaiveDate) -> Vec<Loan> {
    let next = schedule::add_months(today, 1).unwrap_or(today);

    vec![
        Loan {
            id: "1".to_string(),
            name: "iPhone 14 EMI".to_string(),
            loan_type: LoanType::Phone,
            total_amount: dec!(80000),
            remaining_amount: dec!(60000),
            interest_rate: dec!(12),
            start_date: ymd(2023, 1, 15),
            end_date: ymd(2024, 1, 15),
            emi_amount: dec!(7000),
            next_payment_date: next,
            payment_history: vec![
                paid("p1", dec!(7000), ymd(2023, 2, 15), PaymentMethod::Upi),
                paid("p2", dec!(7000), ymd(2023, 3, 15), PaymentMethod::Bank),
                paid("p3", dec!(7000), ymd(2023, 4, 15), PaymentMethod::Wallet),
            ],
            lender: "HDFC Bank".to_string(),
            account_number: Some("XXXX1234".to_string()),
            is_manual: false,
        },
        Loan {
            id: "2".to_string(),
            name: "Car Loan - Honda City".to_string(),
            loan_type: LoanType::Car,
            total_amount: dec!(800000),
            remaining_amount: dec!(600000),
            interest_rate: dec!(8.5),
            start_date: ymd(2022, 10, 10),
            end_date: ymd(2027, 10, 10),
            emi_amount: dec!(15000),
            next_payment_date: next,
            payment_history: vec![
                paid("p4", dec!(15000), ymd(2022, 11, 10), PaymentMethod::Bank),
                paid("p5", dec!(15000), ymd(2022, 12, 10), PaymentMethod::Bank),
            ],
            lender: "SBI".to_string(),
            account_number: Some("XXXX5678".to_string()),
            is_manual: false,
        },
        Loan {
            id: "3".to_string(),
            name: "Home Loan".to_string(),
            loan_type: LoanType::Property,
            total_amount: dec!(5000000),
            remaining_amount: dec!(4500000),
            interest_rate: dec!(7.2),
            start_date: ymd(2022, 5, 20),
            end_date: ymd(2042, 5, 20),
            emi_amount: dec!(40000),
            next_payment_date: next,
            payment_history: vec![
                paid("p6", dec!(40000), ymd(2022, 6, 20), PaymentMethod::Bank),
                paid("p7", dec!(40000), ymd(2022, 7, 20), PaymentMethod::Bank),
            ],
            lender: "ICICI Bank".to_string(),
            account_number: Some("XXXX9012".to_string()),
            is_manual: false,
        },
    ]
}
