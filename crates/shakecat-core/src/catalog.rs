use rand::Rng;
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Built-in New Year predictions, in display order.
pub const DEFAULT_MESSAGES: [&str; 15] = [
    "В Новом году вас ждёт волшебное событие! ❄️",
    "Морозный воздух принесёт удачу в делах 🎄",
    "Под ёлкой найдётся то, о чём давно мечтали 🎁",
    "Новогодняя ночь исполнит ваше заветное желание ✨",
    "Снежинка счастья опустится на вашу ладонь ❄️",
    "В первый день года вас ждёт приятный сюрприз 🎉",
    "Дед Мороз исполнит три ваших желания 🎅",
    "Новогодние праздники принесут радость в дом 🏠",
    "Зимние каникулы станут незабываемыми 🛷",
    "Новый год откроет двери к мечте 🚪",
    "Снежный ком удачи покатится в вашу сторону ⛄",
    "Новогоднее чудо уже в пути! 🌟",
    "Бой курантов принесёт перемены к лучшему ⏰",
    "Ёлочные огни осветят путь к успеху 💡",
    "Под Новый год сбываются самые смелые мечты! 🎆",
];

/// Immutable, ordered, non-empty list of reveal messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PredictionCatalog {
    messages: Vec<String>,
}

impl Default for PredictionCatalog {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl PredictionCatalog {
    /// Validate and wrap a message list. Entries are kept verbatim.
    pub fn from_messages<I, S>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        if let Some(index) = messages.iter().position(|m| m.trim().is_empty()) {
            return Err(CoreError::BlankMessage { index });
        }
        Ok(Self { messages })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    /// Uniform pick. The catalog is never empty, so this always succeeds.
    pub fn pick(&self, rng: &mut impl Rng) -> &str {
        let idx = rng.random_range(0..self.messages.len());
        &self.messages[idx]
    }
}
