use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clothing::{ClothingState, ClothingType, FitStyle, StyleOptions};

/// A saved try-on result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub id: Uuid,
    pub user_id: String,
    pub image_url: String,
    pub clothing_type: ClothingType,
    pub fit_style: FitStyle,
    pub clothing_state: ClothingState,
    pub created_at: DateTime<Utc>,
}

impl Outfit {
    pub fn style(&self) -> StyleOptions {
        StyleOptions::new(self.clothing_type, self.fit_style, self.clothing_state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOutfit {
    pub user_id: String,
    pub image_url: String,
    pub clothing_type: ClothingType,
    pub fit_style: FitStyle,
    pub clothing_state: ClothingState,
}

impl NewOutfit {
    pub fn new(user_id: impl Into<String>, image_url: impl Into<String>, style: StyleOptions) -> Self {
        Self {
            user_id: user_id.into(),
            image_url: image_url.into(),
            clothing_type: style.clothing_type,
            fit_style: style.fit_style,
            clothing_state: style.clothing_state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Style,
    Photo,
    Daily,
    Achievement,
    Social,
    #[serde(other)]
    Other,
}

/// Reward ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: Uuid,
    pub user_id: String,
    pub token_name: String,
    pub token_value: f64,
    pub token_type: TokenKind,
    #[serde(default)]
    pub description: Option<String>,
    pub earned_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewToken {
    pub user_id: String,
    pub token_name: String,
    pub token_value: f64,
    pub token_type: TokenKind,
    pub description: Option<String>,
}

pub fn total_value(tokens: &[Token]) -> f64 {
    tokens.iter().map(|t| t.token_value).sum()
}

pub fn group_by_kind(tokens: &[Token]) -> BTreeMap<TokenKind, Vec<&Token>> {
    let mut groups: BTreeMap<TokenKind, Vec<&Token>> = BTreeMap::new();
    for token in tokens {
        groups.entry(token.token_type).or_default().push(token);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, value: f64) -> Token {
        let now = Utc::now();
        Token {
            id: Uuid::new_v4(),
            user_id: "user_1".into(),
            token_name: "test".into(),
            token_value: value,
            token_type: kind,
            description: None,
            earned_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_total_and_grouping() {
        let tokens = vec![
            token(TokenKind::Style, 2.5),
            token(TokenKind::Daily, 1.0),
            token(TokenKind::Style, 0.5),
        ];
        assert!((total_value(&tokens) - 4.0).abs() < f64::EPSILON);

        let groups = group_by_kind(&tokens);
        assert_eq!(groups[&TokenKind::Style].len(), 2);
        assert_eq!(groups[&TokenKind::Daily].len(), 1);
        assert!(!groups.contains_key(&TokenKind::Social));
    }

    #[test]
    fn test_unknown_token_type_maps_to_other() {
        let kind: TokenKind = serde_json::from_str("\"streak\"").unwrap();
        assert_eq!(kind, TokenKind::Other);
        let kind: TokenKind = serde_json::from_str("\"achievement\"").unwrap();
        assert_eq!(kind, TokenKind::Achievement);
    }
}
