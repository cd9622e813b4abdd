use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Top-level workspace sections reachable from the navigation bar.
///
/// Each route maps one-to-one onto a hash fragment (`#strain`, `#lifecycle`,
/// ...) so a section can be requested on the command line the same way it is
/// bookmarked in a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Strain,
    Substrate,
    Lifecycle,
    Generation,
    Vendor,
    Stage,
    Ingredient,
}

impl Route {
    /// Every route in navigation order.
    pub const ALL: [Route; 7] = [
        Route::Strain,
        Route::Substrate,
        Route::Lifecycle,
        Route::Generation,
        Route::Vendor,
        Route::Stage,
        Route::Ingredient,
    ];

    /// The resource name the backend uses for this section.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Strain => "strain",
            Route::Substrate => "substrate",
            Route::Lifecycle => "lifecycle",
            Route::Generation => "generation",
            Route::Vendor => "vendor",
            Route::Stage => "stage",
            Route::Ingredient => "ingredient",
        }
    }

    /// Human readable label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Strain => "Strains",
            Route::Substrate => "Substrates",
            Route::Lifecycle => "Lifecycles",
            Route::Generation => "Generations",
            Route::Vendor => "Vendors",
            Route::Stage => "Stages",
            Route::Ingredient => "Ingredients",
        }
    }

    /// Renders the route back into its `#name` hash form.
    pub fn hash(&self) -> String {
        format!("#{}", self.name())
    }

    /// Parses a location hash. The leading `#` is optional; unknown names
    /// yield `None` so callers can fall back to their default section.
    pub fn from_hash(hash: &str) -> Option<Route> {
        let name = hash.trim().trim_start_matches('#');
        Route::ALL.into_iter().find(|route| route.name().eq_ignore_ascii_case(name))
    }

    /// Position of the route in [`Route::ALL`].
    pub fn ordinal(&self) -> usize {
        Route::ALL.iter().position(|route| route == self).unwrap_or_default()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash())
    }
}

impl FromStr for Route {
    type Err = ParseRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::from_hash(s).ok_or_else(|| ParseRouteError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRouteError(String);

impl fmt::Display for ParseRouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown section '{}'; expected one of #strain, #substrate, #lifecycle, #generation, #vendor, #stage, #ingredient",
            self.0
        )
    }
}

impl Error for ParseRouteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hash_with_and_without_prefix() {
        assert_eq!(Route::from_hash("#lifecycle"), Some(Route::Lifecycle));
        assert_eq!(Route::from_hash("vendor"), Some(Route::Vendor));
        assert_eq!(Route::from_hash(" #Stage "), Some(Route::Stage));
    }

    #[test]
    fn unknown_hash_is_rejected() {
        assert_eq!(Route::from_hash("#reports"), None);
        assert!("#notes".parse::<Route>().is_err());
    }

    #[test]
    fn hash_round_trips_for_every_route() {
        for route in Route::ALL {
            assert_eq!(Route::from_hash(&route.hash()), Some(route));
        }
    }

    #[test]
    fn ordinal_follows_navigation_order() {
        assert_eq!(Route::Strain.ordinal(), 0);
        assert_eq!(Route::Ingredient.ordinal(), 6);
    }
}
