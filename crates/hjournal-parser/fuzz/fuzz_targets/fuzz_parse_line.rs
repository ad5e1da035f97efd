#![no_main]
//! Fuzz target for individual journal items.
//!
//! Generates structured inputs that look like journal syntax so the fuzzer
//! reaches the deeper lexer modes and grammar rules.

use arbitrary::Arbitrary;
use hjournal_parser::{parse_to_cooked_with, Options};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    date_year: u16,
    date_month: u8,
    date_day: u8,
    item_type: u8,
    account: String,
    amount: i64,
    commodity: String,
    description: String,
    tag: String,
}

impl FuzzInput {
    fn to_journal(&self) -> String {
        let date = format!(
            "{:04}/{:02}/{:02}",
            self.date_year % 3000,
            (self.date_month % 12) + 1,
            (self.date_day % 28) + 1
        );

        let account: String = self
            .account
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ':')
            .take(50)
            .collect();
        let account = if account.is_empty() {
            "Assets:Test".to_string()
        } else {
            account
        };

        let commodity: String = self
            .commodity
            .chars()
            .filter(|c| c.is_alphabetic())
            .take(10)
            .collect();
        let commodity = if commodity.is_empty() {
            "$".to_string()
        } else {
            commodity
        };

        let description: String = self
            .description
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .take(100)
            .collect();

        let tag: String = self
            .tag
            .chars()
            .filter(|c| c.is_alphanumeric())
            .take(20)
            .collect();

        match self.item_type % 9 {
            0 => format!("account {account}  ; {tag}: x"),
            1 => format!(
                "{date} * {description}\n    {account}  {} {commodity}\n    ; {tag}:\n    Assets:Other",
                self.amount
            ),
            2 => format!("P {date} {commodity} {} USD", self.amount),
            3 => format!("commodity {} {commodity}\n  format 1.000,00 {commodity}", self.amount),
            4 => format!("D {commodity}{}", self.amount),
            5 => format!("Y {}", self.date_year % 3000),
            6 => format!("comment\n{description}\nend comment"),
            7 => format!("; {description}"),
            8 => format!(
                "{:02}.{:02} {description}\n    ({account})  -{} @@ {commodity}1 = 0",
                (self.date_month % 12) + 1,
                (self.date_day % 28) + 1,
                self.amount
            ),
            _ => String::new(),
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let journal = input.to_journal();
    let _ = parse_to_cooked_with(&journal, &Options::new().with_default_year(2000));
});
