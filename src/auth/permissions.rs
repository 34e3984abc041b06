// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission strings and the permission check.
//!
//! Each endpoint names its required permission through a marker type
//! implementing [`Permission`], used as the parameter of the
//! [`Authorized`](super::Authorized) extractor.

use super::{AuthError, Claims};

/// A permission string required by an endpoint.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($(#[$meta:meta])* $marker:ident => $name:literal,)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $marker;

            impl Permission for $marker {
                const NAME: &'static str = $name;
            }
        )*

        #[cfg(test)]
        const ALL_PERMISSIONS: &[&str] = &[$($name),*];
    };
}

permissions! {
    ViewActors => "view:actors",
    CreateActors => "create:actors",
    EditActors => "edit:actors",
    DeleteActors => "delete:actors",
    ViewMovies => "view:movies",
    CreateMovies => "create:movies",
    EditMovies => "edit:movies",
    DeleteMovies => "delete:movies",
}

/// Check that `claims` grant `permission`.
///
/// `None` means the token produced no usable payload.
pub fn check_permissions(permission: &str, claims: Option<&Claims>) -> Result<(), AuthError> {
    let claims = claims.ok_or(AuthError::InvalidPayload)?;

    if claims.permissions.is_none() {
        return Err(AuthError::InvalidClaims);
    }

    if !claims.has_permission(permission) {
        return Err(AuthError::Unauthorized);
    }

    Ok(())
}
