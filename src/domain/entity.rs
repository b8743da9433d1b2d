//! Selectable record types and their identity.
//!
//! Every row in the table is an [`Entity`]: an immutable snapshot of either a
//! [`User`] or an [`Order`], tagged with its variant and carrying a stable
//! [`EntityId`]. Snapshots are replaced wholesale on every refresh, so two
//! entities describing the same record are only ever related through their id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Opaque, stable identity of a record.
///
/// Selection membership is decided by this value alone, never by comparing
/// the rest of the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The category a table shows.
///
/// Selects both the entity variant in the rows and the list of bulk actions
/// offered for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    /// User accounts.
    Users,
    /// Customer orders.
    Orders,
}

impl Context {
    /// Lowercase tag used in configuration and serialized entities.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Orders => "orders",
        }
    }

    /// Title shown in the table header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Orders => "Orders",
        }
    }

    /// Record noun, pluralised for `count`.
    ///
    /// ```
    /// use bulkbar::domain::Context;
    ///
    /// assert_eq!(Context::Orders.noun(1), "order");
    /// assert_eq!(Context::Orders.noun(2), "orders");
    /// ```
    #[must_use]
    pub const fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (Self::Users, 1) => "user",
            (Self::Users, _) => "users",
            (Self::Orders, 1) => "order",
            (Self::Orders, _) => "orders",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" | "user" => Ok(Self::Users),
            "orders" | "order" => Ok(Self::Orders),
            other => Err(format!("unknown context `{other}`")),
        }
    }
}

/// Account state of a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

/// Fulfilment state of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processed,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Shipped => "shipped",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A user account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub password_reset_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates an active user created now, never logged in.
    ///
    /// ```
    /// use bulkbar::domain::{User, UserStatus};
    ///
    /// let user = User::new("u-1", "Ada", "ada@example.com");
    /// assert_eq!(user.status, UserStatus::Active);
    /// assert!(user.last_login.is_none());
    /// ```
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            status: UserStatus::Active,
            created_at: Utc::now(),
            last_login: None,
            password_reset_at: None,
        }
    }
}

/// A customer order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub customer: String,
    /// Order total in cents.
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a pending order placed now.
    pub fn new(id: impl Into<EntityId>, customer: impl Into<String>, total_cents: i64) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            total_cents,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
            shipped_at: None,
        }
    }

    /// Formats the total as a currency amount, e.g. `"$12.50"`.
    #[must_use]
    pub fn total_display(&self) -> String {
        let sign = if self.total_cents < 0 { "-" } else { "" };
        let cents = self.total_cents.unsigned_abs();
        format!("{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

/// A selectable row: one of the record variants, tagged by `kind`.
///
/// ```
/// use bulkbar::domain::{Context, Entity, Order};
///
/// let entity = Entity::from(Order::new("o-7", "Grace", 1250));
/// assert_eq!(entity.id().as_str(), "o-7");
/// assert_eq!(entity.context(), Context::Orders);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    User(User),
    Order(Order),
}

impl Entity {
    /// Identity used for selection membership.
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        match self {
            Self::User(user) => &user.id,
            Self::Order(order) => &order.id,
        }
    }

    /// The context this variant belongs to.
    #[must_use]
    pub const fn context(&self) -> Context {
        match self {
            Self::User(_) => Context::Users,
            Self::Order(_) => Context::Orders,
        }
    }

    /// Status label of the underlying record.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match self {
            Self::User(user) => user.status.label(),
            Self::Order(order) => order.status.label(),
        }
    }

    /// Text the search filter matches against.
    #[must_use]
    pub fn search_text(&self) -> String {
        match self {
            Self::User(user) => format!("{} {} {}", user.id, user.name, user.email),
            Self::Order(order) => format!("{} {}", order.id, order.customer),
        }
    }

    #[must_use]
    pub const fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Order(_) => None,
        }
    }

    #[must_use]
    pub const fn as_order(&self) -> Option<&Order> {
        match self {
            Self::Order(order) => Some(order),
            Self::User(_) => None,
        }
    }
}

impl From<User> for Entity {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Order> for Entity {
    fn from(order: Order) -> Self {
        Self::Order(order)
    }
}

/// Returns a short description of how long ago `at` was, relative to `now`.
///
/// - Less than 1 minute: "just now"
/// - Less than 1 hour: "Xm ago"
/// - Less than 1 day: "Xh ago"
/// - 1 day or more: "Xd ago"
#[must_use]
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - at).num_seconds();

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        let mins = diff / SECONDS_PER_MINUTE;
        format!("{mins}m ago")
    } else if diff < SECONDS_PER_DAY {
        let hours = diff / SECONDS_PER_HOUR;
        format!("{hours}h ago")
    } else {
        let days = diff / SECONDS_PER_DAY;
        format!("{days}d ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn entities_deserialize_by_kind_tag() {
        let json = r#"[
            {"kind": "user", "id": "u-1", "name": "Ada", "email": "ada@example.com",
             "status": "inactive", "created_at": "2024-01-02T03:04:05Z"},
            {"kind": "order", "id": "o-1", "customer": "Grace", "total_cents": 4200,
             "status": "pending", "created_at": "2024-01-02T03:04:05Z"}
        ]"#;

        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();

        assert_eq!(entities[0].context(), Context::Users);
        assert_eq!(entities[0].status_label(), "inactive");
        assert_eq!(entities[1].context(), Context::Orders);
        assert_eq!(entities[1].as_order().unwrap().processed_at, None);
    }

    #[test]
    fn context_parses_singular_and_plural() {
        assert_eq!("Orders".parse::<Context>(), Ok(Context::Orders));
        assert_eq!(" user ".parse::<Context>(), Ok(Context::Users));
        assert!("invoices".parse::<Context>().is_err());
    }

    #[test]
    fn total_display_formats_cents() {
        assert_eq!(Order::new("o-1", "x", 1250).total_display(), "$12.50");
        assert_eq!(Order::new("o-2", "x", 7).total_display(), "$0.07");
        assert_eq!(Order::new("o-3", "x", -300).total_display(), "-$3.00");
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(10), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(7), now), "7d ago");
    }
}
