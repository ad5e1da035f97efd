//! Integration tests for the parser crate.
//!
//! Tests run whole journals through the public entry points: lexing,
//! parsing, raw lowering and cooking.

use hjournal_core::{
    format_journal, AccountKind, Amount, Date, Description, FormatConfig, Journal, StatusIndicator,
    Tag,
};
use hjournal_parser::raw::RawItem;
use hjournal_parser::{
    parse_to_cooked_with, parse_to_cst, parse_to_cst_recovering, parse_to_raw, tokenize, Error,
    ErrorPolicy, Options, ParseErrorKind, Rule, TokenKind,
};
use rust_decimal_macros::dec;

// ============================================================================
// Helper Functions
// ============================================================================

fn cook(source: &str) -> Journal {
    cook_in(source, 1999)
}

fn cook_in(source: &str, default_year: i32) -> Journal {
    let options = Options::new().with_default_year(default_year);
    parse_to_cooked_with(source, &options)
        .unwrap_or_else(|e| panic!("failed to cook {source:?}:\n{}", e.render(source)))
}

/// Route pipeline logs to the test harness. Set `RUST_LOG` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn date(year: i32, month: u32, day: u32) -> Date {
    Date::new(year, month, day).expect("valid test date")
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_year_directive_sets_default_year() {
    let journal = cook("Y 2000\n\n01.23 transaction\n");
    assert_eq!(journal.transactions.len(), 1);
    assert_eq!(journal.transactions[0].date, date(2000, 1, 23));
    assert_eq!(
        journal.transactions[0].description,
        Description::Text("transaction".to_string())
    );
}

#[test]
fn test_transaction_with_posting_date() {
    let journal = cook("1900/01/01=2020/02/02\n");
    let txn = &journal.transactions[0];
    assert_eq!(txn.date, date(1900, 1, 1));
    assert_eq!(txn.posting_date, Some(date(2020, 2, 2)));
}

#[test]
fn test_price_directive() {
    let journal = cook("P 1900/01/01 $ 10CAD\n");
    assert_eq!(journal.prices.len(), 1);
    let price = &journal.prices[0];
    assert_eq!(price.date, date(1900, 1, 1));
    assert_eq!(price.commodity, "$");
    assert_eq!(price.price, Amount::new(dec!(10), "CAD"));
}

#[test]
fn test_missing_year_uses_caller_fallback() {
    let journal = cook_in("12/31 x\n", 2024);
    assert_eq!(journal.transactions[0].date, date(2024, 12, 31));
}

#[test]
fn test_every_year_directive_spelling() {
    let journal = cook("Y 2001\n1/1 a\nyear 2002\n1/1 b\napply year 2003\n1/1 c\n");
    let years: Vec<i32> = journal.transactions.iter().map(|t| t.date.year).collect();
    assert_eq!(years, vec![2001, 2002, 2003]);
}

#[test]
fn test_full_transaction() {
    let source = "\
2024-03-05=03-07 * (#443) Grocer | weekly shop ; trip: 12
    Expenses:Food         $-1,234.50 @ 1.35 CAD ; receipt:
    ; kept: yes
    ! (Budget:Food)       1.000,00 EUR = 0 EUR
    [Assets:Savings]
";
    let journal = cook(source);
    let txn = &journal.transactions[0];
    assert_eq!(txn.date, date(2024, 3, 5));
    assert_eq!(txn.posting_date, Some(date(2024, 3, 7)));
    assert_eq!(txn.status, StatusIndicator::Cleared);
    assert_eq!(txn.cheque_number.as_deref(), Some("#443"));
    assert_eq!(
        txn.description,
        Description::PayeeMemo {
            payee: "Grocer".to_string(),
            memo: "weekly shop".to_string(),
        }
    );
    assert_eq!(txn.tags, vec![Tag::with_value("trip", "12")]);

    let [food, budget, savings] = txn.postings.as_slice() else {
        panic!("expected three postings, got {:?}", txn.postings);
    };
    assert_eq!(food.account, vec!["Expenses", "Food"]);
    assert_eq!(food.amount, Some(Amount::new(dec!(-1234.50), "$")));
    let price = food.lot_price.as_ref().expect("lot price");
    assert_eq!(price.amount, Amount::new(dec!(1.35), "CAD"));
    assert_eq!(
        food.tags,
        vec![Tag::new("receipt"), Tag::with_value("kept", "yes")]
    );

    assert_eq!(budget.status, StatusIndicator::Pending);
    assert_eq!(budget.kind, AccountKind::Virtual);
    assert_eq!(budget.amount, Some(Amount::new(dec!(1000.00), "EUR")));
    assert!(budget.assertion.is_some());

    assert_eq!(savings.kind, AccountKind::VirtualBalanced);
    assert_eq!(savings.account, vec!["Assets", "Savings"]);
    assert_eq!(savings.amount, None);
}

#[test]
fn test_unclosed_paren_is_description_text() {
    let journal = cook("2024-01-01 (unclosed desc\n    a  1\n");
    let txn = &journal.transactions[0];
    assert_eq!(txn.cheque_number, None);
    assert_eq!(
        txn.description,
        Description::Text("(unclosed desc".to_string())
    );
    assert_eq!(txn.postings.len(), 1);
}

#[test]
fn test_directives_cook_into_their_categories() {
    let source = "\
; header comment
account Assets:Chequing  ; type: asset
  ; note: main
commodity \"green apples\"
  format 1,000.00 \"green apples\"
D $1,000.00
P 2024-01-01 EUR $1.10
comment
anything at all
end comment
";
    let journal = cook(source);
    assert!(journal.transactions.is_empty());

    assert_eq!(journal.accounts.len(), 1);
    assert_eq!(journal.accounts[0].account, vec!["Assets", "Chequing"]);
    assert_eq!(
        journal.accounts[0].tags,
        vec![Tag::with_value("type", "asset"), Tag::with_value("note", "main")]
    );

    let [apples, default] = journal.commodities.as_slice() else {
        panic!("expected two commodities");
    };
    assert_eq!(apples.commodity.as_deref(), Some("green apples"));
    assert_eq!(
        apples.format,
        Some(Amount::new(dec!(1000.00), "green apples"))
    );
    assert!(default.is_default);
    assert_eq!(default.commodity.as_deref(), Some("$"));

    assert_eq!(journal.prices[0].price, Amount::new(dec!(1.10), "$"));
}

#[test]
fn test_formatted_journal_cooks_to_the_same_journal() {
    let source = "\
account Assets:Chequing  ; type: asset
commodity \"green apples\"
  format 1,000.00 \"green apples\"
D $1,000.00
P 2024-01-01 EUR $1.10 ; source: bank
2024-03-05=03-07 * (#443) Grocer | weekly shop ; trip: 12
    Expenses:Food  $-1,234.50 @ 1.35 CAD ; receipt:
    ; kept: yes
    ! (Budget:Food)  1.000,00 EUR = 0 EUR
    [Assets:Savings]
";
    let journal = cook(source);
    let formatted = format_journal(&journal, &FormatConfig::default());
    assert_eq!(cook(&formatted), journal, "formatted as:\n{formatted}");
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_comment_without_tags_yields_no_tags() {
    let journal = cook("2024-01-01 x ; just text\n    a  1\n    ; more text\n");
    let txn = &journal.transactions[0];
    assert!(txn.tags.is_empty());
    assert!(txn.postings[0].tags.is_empty());
}

#[test]
fn test_plain_comments_on_every_line_kind() {
    let source = "account Assets  ; opened in 2019\n\
                  2024-01-01 x ; just words here\n    a  1 ; no tags at all\n";
    let journal = cook(source);
    assert!(journal.accounts[0].tags.is_empty());
    let txn = &journal.transactions[0];
    assert!(txn.tags.is_empty());
    assert!(txn.postings[0].tags.is_empty());
}

#[test]
fn test_tags_keep_order_and_multiplicity() {
    let journal = cook("2024-01-01 x ; a: 1, b:, c: three words\n");
    assert_eq!(
        journal.transactions[0].tags,
        vec![
            Tag::with_value("a", "1"),
            Tag::new("b"),
            Tag::with_value("c", "three words"),
        ]
    );
}

#[test]
fn test_comment_line_before_first_posting_tags_transaction() {
    let journal = cook("2024-01-01 x\n    ; early: yes\n    a  1\n");
    let txn = &journal.transactions[0];
    assert_eq!(txn.tags, vec![Tag::with_value("early", "yes")]);
    assert!(txn.postings[0].tags.is_empty());
}

#[test]
fn test_unicode_tag_names() {
    let journal = cook("2024-01-01 x ; 日本: はい\n");
    assert_eq!(
        journal.transactions[0].tags,
        vec![Tag::with_value("日本", "はい")]
    );
}

// ============================================================================
// Multiline comments
// ============================================================================

#[test]
fn test_unterminated_multiline_comment() {
    let raw = parse_to_raw("comment\nfirst\nsecond").unwrap();
    assert_eq!(
        raw,
        vec![RawItem::MultilineComment(vec![
            "first".to_string(),
            "second".to_string()
        ])]
    );
}

#[test]
fn test_end_comment_only_at_line_start() {
    let raw = parse_to_raw("comment\ntext end comment more\nend comment\n").unwrap();
    assert_eq!(
        raw,
        vec![RawItem::MultilineComment(vec![
            "text end comment more".to_string()
        ])]
    );
}

#[test]
fn test_end_comment_with_trailing_text_is_rejected() {
    match parse_to_raw("comment\nend comment trailing\n2024-01-01 x\n") {
        Err(Error::Lexical(err)) => assert_eq!(err.line, 2),
        other => panic!("expected a lexical error, got {other:?}"),
    }
}

#[test]
fn test_end_comment_with_trailing_blanks_closes_comment() {
    let journal = cook("comment\nhidden\nend comment \t\n2024-01-01 shown\n");
    assert_eq!(journal.transactions.len(), 1);
}

#[test]
fn test_multiline_comment_hides_journal_syntax() {
    let journal = cook("comment\n2024-01-01 hidden\n    a  1\nend comment\n01/01 shown\n");
    assert_eq!(journal.transactions.len(), 1);
}

// ============================================================================
// Account names and numbers
// ============================================================================

#[test]
fn test_brackets_in_account_directive_are_literal() {
    let tokens = tokenize("account (Assets:Chequing)\n").unwrap();
    let name = tokens
        .iter()
        .find(|t| t.kind == TokenKind::AccountName)
        .unwrap();
    assert_eq!(name.account_segments(), vec!["(Assets", "Chequing)"]);

    let journal = cook("account (Assets:Chequing)\n");
    assert_eq!(journal.accounts[0].account, vec!["(Assets", "Chequing)"]);
}

#[test]
fn test_brackets_in_posting_mark_virtual_account() {
    let journal = cook("2024-01-01 x\n    (Assets:Chequing)  1\n");
    let posting = &journal.transactions[0].postings[0];
    assert_eq!(posting.kind, AccountKind::Virtual);
    assert_eq!(posting.account, vec!["Assets", "Chequing"]);
}

#[test]
fn test_indian_grouped_number() {
    let tokens = tokenize("2024-01-01 x\n    a  -1,00,00,000.00\n").unwrap();
    let numbers: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .collect();
    assert_eq!(numbers.len(), 1);
    let literal = numbers[0].number_literal().unwrap();
    assert_eq!(literal.decimal_mark, Some('.'));
    assert_eq!(literal.normalized(), "10000000.00");

    let journal = cook("2024-01-01 x\n    a  -1,00,00,000.00\n");
    assert_eq!(
        journal.transactions[0].postings[0].amount,
        Some(Amount::bare(dec!(-10000000.00)))
    );
}

#[test]
fn test_comma_decimal_mark() {
    let tokens = tokenize("2024-01-01 x\n    a  1.000,00\n").unwrap();
    let number = tokens.iter().find(|t| t.kind == TokenKind::Number).unwrap();
    assert_eq!(number.number_literal().unwrap().decimal_mark, Some(','));
}

#[test]
fn test_exponent_amount() {
    let journal = cook("2024-01-01 x\n    a  1.3e4 USD\n");
    assert_eq!(
        journal.transactions[0].postings[0].amount,
        Some(Amount::new(dec!(13000), "USD"))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_calendar_date_is_a_lex_error() {
    let err = parse_to_cst("2023-02-30 x\n").unwrap_err();
    assert!(matches!(err, Error::Lexical(_)));
}

#[test]
fn test_leap_day_without_year_fails_in_non_leap_year() {
    let options = Options::new().with_default_year(2023);
    let err = parse_to_cooked_with("02/29 x\n", &options).unwrap_err();
    assert!(matches!(err, Error::Semantic(_)));
    assert_eq!(err.code(), 202);

    assert_eq!(cook_in("02/29 x\n", 2024).transactions[0].date, date(2024, 2, 29));
}

#[test]
fn test_parse_error_position_and_attempted_rule() {
    let source = "2024-01-01 ok\n    a  1\nP 2024-01-01 USD\n";
    let Err(Error::Syntactic(err)) = parse_to_cst(source) else {
        panic!("expected a parse error");
    };
    assert_eq!(err.attempted, vec![Rule::PriceDirective]);
    let location = err.location.expect("location");
    assert_eq!(location.line, 3);
}

#[test]
fn test_orphan_indented_line() {
    let Err(Error::Syntactic(err)) = parse_to_cst("    ; orphan\n") else {
        panic!("expected a parse error");
    };
    assert!(matches!(err.kind, ParseErrorKind::InvalidLineStart(_)));
    assert!(err.hint.is_some());
}

#[test]
fn test_orphan_indented_line_after_blank_line() {
    let source = "2024-01-01 x\n  a  $1\n\n  b  $2\n";
    let Err(Error::Syntactic(err)) = parse_to_cst(source) else {
        panic!("expected a parse error");
    };
    assert!(matches!(err.kind, ParseErrorKind::InvalidLineStart(_)));
    assert_eq!(err.span.start, 22);
    assert_eq!(err.location.expect("location").line, 4);
}

#[test]
fn test_lowercase_price_keyword_is_not_a_directive() {
    let err = parse_to_cst("p 2024-01-01 USD 1\n").unwrap_err();
    assert!(matches!(err, Error::Lexical(_)));
}

#[test]
fn test_recovering_parse_keeps_good_items() {
    init_tracing();
    let source = "P 2024-01-01 USD\n01/01 ok\n    a  1\nP 2024-01-02 USD\n";
    let (cst, errors) = parse_to_cst_recovering(source).unwrap();
    let cst = cst.expect("tree");
    let rules: Vec<Rule> = cst.child_nodes().map(|n| n.rule).collect();
    assert_eq!(rules, vec![Rule::Transaction]);
    assert_eq!(errors.len(), 2);
    let lines: Vec<usize> = errors
        .iter()
        .filter_map(|e| e.location.map(|l| l.line))
        .collect();
    assert_eq!(lines, vec![1, 4]);
}

#[test]
fn test_skip_item_policy_matches_clean_input() {
    init_tracing();
    let with_errors = "P 2024-01-01 USD\n01/01 ok\n    a  1\n";
    let options = Options::new()
        .with_default_year(2010)
        .with_error_policy(ErrorPolicy::SkipItem);
    let journal = parse_to_cooked_with(with_errors, &options).unwrap();
    assert_eq!(journal, cook_in("01/01 ok\n    a  1\n", 2010));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_cooked_journal_serializes() {
    let journal = cook("2024-01-01 * Cafe | lunch\n    Expenses:Food  $5\n    Assets:Cash\n");
    let json = serde_json::to_value(&journal).unwrap();
    assert_eq!(json["transactions"][0]["status"], "cleared");
    assert_eq!(json["transactions"][0]["description"]["payee"], "Cafe");
    let back: Journal = serde_json::from_value(json).unwrap();
    assert_eq!(back, journal);
}
