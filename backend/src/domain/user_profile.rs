//! User profile and post records fetched from the upstream API.
//!
//! Both types are immutable snapshots of what the upstream returned for one
//! call. The gateway never edits them; it only projects them into response
//! payloads.

/// Full user profile as published by the upstream API.
///
/// Only `id`, `name`, `username`, and `email` reach the combined response.
/// The remaining fields are carried so cached profiles stay complete.
///
/// # Examples
/// ```
/// use gateway::domain::UserProfile;
///
/// let profile = UserProfile {
///     id: 1,
///     name: "Bob".to_owned(),
///     username: "bob".to_owned(),
///     email: "bob@x.com".to_owned(),
///     ..UserProfile::default()
/// };
/// assert!(profile.address.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    /// Upstream identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Account handle.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Postal address, when published.
    pub address: Option<Address>,
    /// Phone number, when published.
    pub phone: Option<String>,
    /// Personal website, when published.
    pub website: Option<String>,
    /// Employer details, when published.
    pub company: Option<Company>,
}

/// Postal address attached to a profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub street: String,
    pub suite: Option<String>,
    pub city: String,
    pub zipcode: String,
    pub geo: Option<Geo>,
}

/// Coordinates as the upstream encodes them (decimal strings).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

/// Employer details attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Company {
    pub name: String,
    pub catch_phrase: Option<String>,
    pub bs: Option<String>,
}

/// One post authored by a user.
///
/// Posts arrive as an ordered sequence. The order is whatever the upstream
/// returned and is preserved end to end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Post {
    /// Identifier of the authoring user.
    pub user_id: i64,
    /// Post identifier.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body text.
    pub body: String,
}
