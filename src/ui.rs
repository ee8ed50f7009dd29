//! Message texts and menus shown to users. Texts use Telegram HTML markup.

use crate::core::currency::{Currency, CurrencySet};
use crate::core::messenger::{Menu, MenuAction, MenuOption};

const AGAIN_HINT: &str = "Convert again: /start";

/// Formats `value` with two decimals and comma thousands separators, e.g. `1,234.50`.
pub fn format_money(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn format_rate(rate: f64) -> String {
    format!("{rate:.4}")
}

fn menu<'a>(
    currencies: impl IntoIterator<Item = &'a Currency>,
    action: impl Fn(&str) -> MenuAction,
) -> Menu {
    Menu {
        options: currencies
            .into_iter()
            .map(|c| MenuOption {
                label: c.label.clone(),
                action: action(&c.code),
            })
            .collect(),
    }
}

pub fn source_menu(currencies: &CurrencySet) -> Menu {
    menu(currencies.all(), |code| MenuAction::Source(code.to_string()))
}

pub fn target_menu(currencies: &CurrencySet, source: &str) -> Menu {
    menu(currencies.excluding(source), |code| MenuAction::Target {
        source: source.to_string(),
        target: code.to_string(),
    })
}

pub fn choose_source() -> String {
    "🔄 Choose the currency to convert <b>from</b>:".to_string()
}

pub fn choose_target(currencies: &CurrencySet, source: &str) -> String {
    format!(
        "✅ From: <b>{}</b>\nNow choose the currency to convert <b>to</b>:",
        currencies.label(source)
    )
}

pub fn enter_amount(currencies: &CurrencySet, source: &str, target: &str) -> String {
    format!(
        "🔄 Ready!\n<b>{}</b> → <b>{}</b>\n\nEnter the amount in {}:",
        currencies.label(source),
        currencies.label(target),
        currencies.label(source)
    )
}

pub fn invalid_amount() -> String {
    "Please enter a valid amount (digits only, e.g. 12.5):".to_string()
}

pub fn fetching_rates() -> String {
    "⏳ Fetching current rates...".to_string()
}

pub fn conversion_result(
    currencies: &CurrencySet,
    source: &str,
    target: &str,
    amount: f64,
    rate: f64,
) -> String {
    format!(
        "<b>{} {}</b> = <b>{} {}</b>\nRate: 1 {} = {} {}\n\n{}",
        format_money(amount),
        currencies.label(source),
        format_money(amount * rate),
        currencies.label(target),
        source,
        format_rate(rate),
        target,
        AGAIN_HINT
    )
}

pub fn conversion_failed(currencies: &CurrencySet, source: &str, target: &str) -> String {
    format!(
        "❌ Could not get a rate for {} → {}\nTry another currency pair or try again later.\n\n{}",
        currencies.label(source),
        currencies.label(target),
        AGAIN_HINT
    )
}

pub fn restart_required() -> String {
    "Choose a conversion direction first with /start".to_string()
}

pub fn use_start() -> String {
    "Use the /start command to begin a currency conversion".to_string()
}
