//! Console Commands
//!
//! Line-oriented commands for the terminal frontend. Parsing is separate from
//! execution so the binary only maps each command onto a `Dashboard` call.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::logic::filter::{AmountRange, DateRange, FilterSpec, SortKey, SortOrder, SortSpec};

pub const HELP: &str = "\
commands:
  search <text>            free-text search (no text clears it)
  page <n>                 jump to page n
  fraud-only               toggle fraud-only
  amount <min> <max>       amount range (no args clears it)
  countries <CC,CC,..>     country filter (no args clears it)
  merchants <m,m,..>       merchant filter (no args clears it)
  dates <from|-> <to|->    date range, YYYY-MM-DD, '-' for open
  sort <score|amount|timestamp> [asc|desc]   (no args clears it)
  clear                    drop every filter
  refresh                  reload now
  explain <id>             feature contributions for a transaction
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Search(Option<String>),
    Page(usize),
    ToggleFraudOnly,
    Amount(Option<AmountRange>),
    Countries(BTreeSet<String>),
    Merchants(BTreeSet<String>),
    Dates(DateRange),
    Sort(Option<SortSpec>),
    ClearFilters,
    Refresh,
    Explain(String),
    Help,
    Quit,
}

impl ConsoleCommand {
    /// `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_lowercase().as_str() {
            "" => return Ok(None),
            "search" | "s" => Self::Search(Some(rest.to_string()).filter(|q| !q.is_empty())),
            "page" | "p" => {
                let page = rest
                    .parse()
                    .map_err(|_| format!("page expects a number, got '{}'", rest))?;
                Self::Page(page)
            }
            "fraud-only" | "fraud" => Self::ToggleFraudOnly,
            "amount" => match args.as_slice() {
                [] => Self::Amount(None),
                [min, max] => Self::Amount(Some(AmountRange::new(number(min)?, number(max)?))),
                _ => return Err("amount expects <min> <max>".to_string()),
            },
            "countries" => Self::Countries(list(rest, true)),
            "merchants" => Self::Merchants(list(rest, false)),
            "dates" => match args.as_slice() {
                [] => Self::Dates(DateRange::default()),
                [from, to] => Self::Dates(DateRange::new(date(from)?, date(to)?)),
                _ => return Err("dates expects <from|-> <to|->".to_string()),
            },
            "sort" => match args.as_slice() {
                [] => Self::Sort(None),
                [key] => Self::Sort(Some(SortSpec { key: sort_key(key)?, order: SortOrder::default() })),
                [key, order] => Self::Sort(Some(SortSpec { key: sort_key(key)?, order: sort_order(order)? })),
                _ => return Err("sort expects <key> [asc|desc]".to_string()),
            },
            "clear" => Self::ClearFilters,
            "refresh" | "r" => Self::Refresh,
            "explain" | "x" if !rest.is_empty() => Self::Explain(rest.to_string()),
            "explain" | "x" => return Err("explain expects a transaction id".to_string()),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{}' (try 'help')", other)),
        };

        Ok(Some(command))
    }

    /// The filter set after this command, or `None` when the command is not a
    /// filter edit.
    pub fn edit_filters(&self, current: &FilterSpec) -> Option<FilterSpec> {
        let mut next = current.clone();
        match self {
            Self::ToggleFraudOnly => next.fraud_only = !next.fraud_only,
            Self::Amount(range) => next.amount = *range,
            Self::Countries(countries) => next.countries = countries.clone(),
            Self::Merchants(merchants) => next.merchants = merchants.clone(),
            Self::Dates(dates) => next.dates = *dates,
            Self::Sort(sort) => next.sort = *sort,
            Self::ClearFilters => next = FilterSpec::default(),
            _ => return None,
        }
        Some(next)
    }
}

fn number(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("'{}' is not an amount", raw))
}

fn date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw == "-" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", raw))
}

fn list(raw: &str, upper: bool) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| if upper { s.to_uppercase() } else { s.to_string() })
        .collect()
}

fn sort_key(raw: &str) -> Result<SortKey, String> {
    match raw.to_lowercase().as_str() {
        "score" => Ok(SortKey::Score),
        "amount" => Ok(SortKey::Amount),
        "timestamp" | "time" => Ok(SortKey::Timestamp),
        other => Err(format!("unknown sort key '{}'", other)),
    }
}

fn sort_order(raw: &str) -> Result<SortOrder, String> {
    match raw.to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(format!("unknown sort order '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ConsoleCommand {
        ConsoleCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line_is_nothing() {
        assert_eq!(ConsoleCommand::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_search_keeps_spaces_and_clears_when_empty() {
        assert_eq!(parse("search  new york "), ConsoleCommand::Search(Some("new york".to_string())));
        assert_eq!(parse("search"), ConsoleCommand::Search(None));
    }

    #[test]
    fn test_page_and_explain_arguments() {
        assert_eq!(parse("page 3"), ConsoleCommand::Page(3));
        assert!(ConsoleCommand::parse("page two").is_err());
        assert_eq!(parse("explain TXN-000042"), ConsoleCommand::Explain("TXN-000042".to_string()));
        assert!(ConsoleCommand::parse("explain").is_err());
    }

    #[test]
    fn test_inverted_amount_is_normalized() {
        let ConsoleCommand::Amount(Some(range)) = parse("amount 5000 0") else {
            panic!("expected an amount range");
        };
        assert_eq!((range.min(), range.max()), (0.0, 5000.0));
        assert!(ConsoleCommand::parse("amount 5 lots").is_err());
    }

    #[test]
    fn test_dates_accept_open_ends() {
        let ConsoleCommand::Dates(range) = parse("dates 2024-03-01 -") else {
            panic!("expected a date range");
        };
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(range.end(), None);
        assert!(ConsoleCommand::parse("dates yesterday -").is_err());
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        assert!(ConsoleCommand::parse("frobnicate").is_err());
    }

    #[test]
    fn test_filter_edits_build_on_current_filters() {
        let current = FilterSpec {
            search: Some("gaming".to_string()),
            ..Default::default()
        };

        let next = parse("countries us, ng").edit_filters(&current).unwrap();
        assert_eq!(next.search.as_deref(), Some("gaming"));
        assert_eq!(next.countries.iter().map(String::as_str).collect::<Vec<_>>(), vec!["NG", "US"]);

        let toggled = parse("fraud-only").edit_filters(&next).unwrap();
        assert!(toggled.fraud_only);
        assert!(!parse("fraud-only").edit_filters(&toggled).unwrap().fraud_only);

        let sorted = parse("sort amount asc").edit_filters(&current).unwrap();
        assert_eq!(sorted.sort, Some(SortSpec { key: SortKey::Amount, order: SortOrder::Asc }));

        assert!(parse("clear").edit_filters(&toggled).unwrap().is_unrestricted());
        assert_eq!(parse("page 2").edit_filters(&current), None);
        assert_eq!(parse("refresh").edit_filters(&current), None);
    }
}
