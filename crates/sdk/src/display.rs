//! Human-readable labels for linked accounts.

use crate::api::{AccountNumberHash, UserPreferenceAccount};
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use schwab_core::AccountDisplayMap;

/// Build the identifier-to-label map used to scrub tool responses.
///
/// Both the plain account number and its hash map to the same label, made
/// from the account nickname and the masked id the API already provides.
pub async fn build_account_display_map(client: &SchwabClient) -> SchwabResult<AccountDisplayMap> {
    let trader = client.trader();
    let numbers = trader.accounts().get_account_numbers().await?;
    let preference = trader.user_preference().get().await?;

    let map = display_map_from(&numbers, preference.accounts());
    tracing::debug!(accounts = numbers.len(), "Built account display map");
    Ok(map)
}

pub(crate) fn display_map_from(
    numbers: &[AccountNumberHash],
    preferences: &[UserPreferenceAccount],
) -> AccountDisplayMap {
    let mut map = AccountDisplayMap::new();
    for entry in numbers {
        let preference = preferences
            .iter()
            .find(|p| p.account_number == entry.account_number);
        let label = account_label(&entry.account_number, preference);

        map.insert(entry.account_number.clone(), label.clone());
        map.insert(entry.hash_value.clone(), label);
    }
    map
}

fn account_label(account_number: &str, preference: Option<&UserPreferenceAccount>) -> String {
    let name = preference
        .and_then(|p| p.nick_name.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or("Account");
    let masked = preference
        .and_then(|p| p.display_acct_id.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("...{}", last_digits(account_number, 4)));
    format!("{name} {masked}")
}

fn last_digits(value: &str, n: usize) -> &str {
    let start = value
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &value[start..]
}

/// Mask an account number for logs, keeping the last four characters.
pub fn mask_account(value: &str) -> String {
    format!("***{}", last_digits(value, 4))
}
