//! Identity and profile store.
//!
//! Pure in-memory state plus (de)serialization for the two persisted
//! keys; the app wires every mutation to a key-value write before the
//! triggering update returns, so a reload immediately after a mutation
//! observes the new value.

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

pub const IDENTITY_KEY: &str = "session.identity";
pub const PROFILE_KEY: &str = "session.profile";

/// Phone numbers are accepted in one fixed shape: the country prefix
/// followed by exactly ten digits.
pub const PHONE_PREFIX: &str = "+91";
pub const PHONE_NATIONAL_DIGITS: usize = 10;

/// The normalized email used as the user's key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Normalizes (trim, lowercase) and validates the raw input.
    pub fn from_email(raw: &str) -> AppResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::validation("Enter an email address"));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default display name derived from the local part of the email.
    #[must_use]
    pub fn default_name(&self) -> String {
        match self.0.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of movie ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist(Vec<u64>);

impl Watchlist {
    /// Set-union append; returns false when the id was already present.
    pub fn add(&mut self, movie_id: u64) -> bool {
        if self.0.contains(&movie_id) {
            return false;
        }
        self.0.push(movie_id);
        true
    }

    #[must_use]
    pub fn contains(&self, movie_id: u64) -> bool {
        self.0.contains(&movie_id)
    }

    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-delimited form used for the profile attribute sync.
    #[must_use]
    pub fn to_delimited(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    #[must_use]
    pub fn from_delimited(raw: &str) -> Self {
        let mut watchlist = Self::default();
        for part in raw.split(',') {
            if let Ok(id) = part.trim().parse() {
                watchlist.add(id);
            }
        }
        watchlist
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub phone: Option<String>,
    pub fav_genre: Option<String>,
    pub watchlist: Watchlist,
}

impl Profile {
    #[must_use]
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            name: identity.default_name(),
            phone: None,
            fav_genre: None,
            watchlist: Watchlist::default(),
        }
    }

    /// Field-by-field overwrite; fields absent from the update are left
    /// untouched, the watchlist is never replaced this way.
    pub fn merge(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(fav_genre) = update.fav_genre {
            self.fav_genre = Some(fav_genre);
        }
    }
}

/// A partial profile update, as submitted from the profile screen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub fav_genre: Option<String>,
}

/// Drops everything except digits and `+` as the user types.
#[must_use]
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

pub fn validate_phone(input: &str) -> AppResult<()> {
    let national = input.strip_prefix(PHONE_PREFIX).ok_or_else(phone_error)?;
    if national.len() != PHONE_NATIONAL_DIGITS
        || !national.chars().all(|c| c.is_ascii_digit())
    {
        return Err(phone_error());
    }
    Ok(())
}

fn phone_error() -> AppError {
    AppError::validation(format!(
        "Phone number must be in the format {PHONE_PREFIX}{}",
        "X".repeat(PHONE_NATIONAL_DIGITS)
    ))
}

/// The signed-in session: identity plus profile, both persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<Identity>,
    profile: Option<Profile>,
}

impl Session {
    /// Signs in with the normalized email. Idempotent: logging in again
    /// with the same normalized email keeps the existing profile; a
    /// different email starts from a fresh default profile.
    pub fn login(&mut self, email: &str) -> AppResult<Identity> {
        let identity = Identity::from_email(email)?;
        if self.identity.as_ref() != Some(&identity) {
            self.profile = Some(Profile::for_identity(&identity));
            self.identity = Some(identity.clone());
        } else if self.profile.is_none() {
            self.profile = Some(Profile::for_identity(&identity));
        }
        Ok(identity)
    }

    pub fn logout(&mut self) {
        self.identity = None;
        self.profile = None;
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Merges the update into the current profile and returns the
    /// merged result. No-op when signed out.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Option<&Profile> {
        let profile = self.profile.as_mut()?;
        profile.merge(update);
        Some(profile)
    }

    /// Returns true when the id was newly added.
    pub fn add_to_watchlist(&mut self, movie_id: u64) -> bool {
        self.profile
            .as_mut()
            .is_some_and(|p| p.watchlist.add(movie_id))
    }

    // --- persistence ---

    #[must_use]
    pub fn identity_bytes(&self) -> Option<Vec<u8>> {
        self.identity.as_ref().and_then(|i| serde_json::to_vec(i).ok())
    }

    #[must_use]
    pub fn profile_bytes(&self) -> Option<Vec<u8>> {
        self.profile.as_ref().and_then(|p| serde_json::to_vec(p).ok())
    }

    /// Restores the identity from persisted bytes; a fresh default
    /// profile is installed until (unless) the persisted profile also
    /// arrives. Returns false on undecodable input.
    pub fn restore_identity(&mut self, bytes: &[u8]) -> bool {
        let Ok(identity) = serde_json::from_slice::<Identity>(bytes) else {
            return false;
        };
        if self.profile.is_none() {
            self.profile = Some(Profile::for_identity(&identity));
        }
        self.identity = Some(identity);
        true
    }

    pub fn restore_profile(&mut self, bytes: &[u8]) -> bool {
        let Ok(profile) = serde_json::from_slice::<Profile>(bytes) else {
            return false;
        };
        self.profile = Some(profile);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn login_normalizes_case_and_whitespace() {
        let mut session = Session::default();
        let identity = session.login("  Ada@Example.COM ").unwrap();
        assert_eq!(identity.as_str(), "ada@example.com");
    }

    #[test]
    fn login_rejects_empty_email() {
        let mut session = Session::default();
        let err = session.login("   ").unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Validation);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn relogin_with_same_email_keeps_the_profile() {
        let mut session = Session::default();
        session.login("ada@example.com").unwrap();
        session.update_profile(ProfileUpdate {
            name: Some("Ada Lovelace".into()),
            ..ProfileUpdate::default()
        });

        session.login("ADA@example.com  ").unwrap();
        assert_eq!(session.profile().unwrap().name, "Ada Lovelace");

        session.login("grace@example.com").unwrap();
        assert_eq!(session.profile().unwrap().name, "grace");
    }

    #[test]
    fn default_name_falls_back_when_local_part_is_missing() {
        let identity = Identity::from_email("@example.com").unwrap();
        assert_eq!(identity.default_name(), "User");

        let identity = Identity::from_email("grace@example.com").unwrap();
        assert_eq!(identity.default_name(), "grace");
    }

    #[test]
    fn profile_updates_merge_instead_of_replacing() {
        let mut session = Session::default();
        session.login("ada@example.com").unwrap();

        session.update_profile(ProfileUpdate {
            name: Some("X".into()),
            ..ProfileUpdate::default()
        });
        session.update_profile(ProfileUpdate {
            phone: Some("+911234567890".into()),
            ..ProfileUpdate::default()
        });

        let profile = session.profile().unwrap();
        assert_eq!(profile.name, "X");
        assert_eq!(profile.phone.as_deref(), Some("+911234567890"));
    }

    #[test]
    fn watchlist_union_ignores_duplicates_and_keeps_order() {
        let mut watchlist = Watchlist::default();
        assert!(watchlist.add(42));
        assert!(watchlist.add(7));
        assert!(!watchlist.add(42));
        assert_eq!(watchlist.ids(), &[42, 7]);
        assert_eq!(watchlist.to_delimited(), "42,7");
    }

    #[test]
    fn watchlist_round_trips_through_the_delimited_form() {
        let parsed = Watchlist::from_delimited("42, 7,42,junk,9");
        assert_eq!(parsed.ids(), &[42, 7, 9]);
    }

    #[test]
    fn phone_validation_enforces_the_fixed_shape() {
        assert!(validate_phone("+911234567890").is_ok());
        assert!(validate_phone("abc").is_err());
        assert!(validate_phone("+91123456789").is_err());
        assert!(validate_phone("+9112345678901").is_err());
        assert!(validate_phone("+9112345678x0").is_err());
        assert!(validate_phone("911234567890").is_err());
    }

    #[test]
    fn phone_input_is_sanitized_to_digits_and_plus() {
        assert_eq!(sanitize_phone("+91 12a34-567b890"), "+911234567890");
        assert_eq!(sanitize_phone("abc"), "");
    }

    #[test]
    fn session_round_trips_through_persisted_bytes() {
        let mut session = Session::default();
        session.login("ada@example.com").unwrap();
        session.add_to_watchlist(42);

        let identity = session.identity_bytes().unwrap();
        let profile = session.profile_bytes().unwrap();

        let mut restored = Session::default();
        assert!(restored.restore_identity(&identity));
        assert!(restored.restore_profile(&profile));
        assert_eq!(restored, session);
    }

    #[test]
    fn restore_rejects_garbage_without_touching_state() {
        let mut session = Session::default();
        assert!(!session.restore_identity(b"not json"));
        assert!(!session.restore_profile(b"{"));
        assert!(!session.is_authenticated());
    }

    proptest! {
        #[test]
        fn login_is_insensitive_to_case_and_surrounding_whitespace(
            local in "[a-z0-9.]{1,12}",
            domain in "[a-z]{1,8}",
        ) {
            let email = format!("{local}@{domain}.com");
            let noisy = format!("  {}\t", email.to_uppercase());

            let plain = Identity::from_email(&email).unwrap();
            let mixed = Identity::from_email(&noisy).unwrap();
            prop_assert_eq!(plain, mixed);
        }

        #[test]
        fn watchlist_never_holds_duplicates(
            ids in proptest::collection::vec(0u64..200, 0..48),
        ) {
            let mut watchlist = Watchlist::default();
            for &id in &ids {
                watchlist.add(id);
            }
            for &id in &ids {
                prop_assert!(!watchlist.add(id));
            }

            let mut seen = std::collections::HashSet::new();
            for &id in watchlist.ids() {
                prop_assert!(seen.insert(id));
            }
        }
    }
}
