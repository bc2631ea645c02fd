//! Site profile registry.

pub mod builtin;

use tracing::debug;
use url::Url;

use pagebridge_protocols::SiteProfile;

/// Picks the profile for a page by host name.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    sites: Vec<SiteProfile>,
    fallback: SiteProfile,
}

impl ProfileRegistry {
    /// Registry holding the built-in profiles.
    pub fn new() -> Self {
        Self {
            sites: builtin::sites(),
            fallback: builtin::generic(),
        }
    }

    /// Add `profiles`, replacing any profile with the same platform name.
    /// A profile named `generic` replaces the fallback.
    pub fn with_overrides(mut self, profiles: impl IntoIterator<Item = SiteProfile>) -> Self {
        for profile in profiles {
            self.insert(profile);
        }
        self
    }

    pub fn insert(&mut self, profile: SiteProfile) {
        if profile.platform == self.fallback.platform {
            self.fallback = profile;
            return;
        }
        match self.sites.iter_mut().find(|p| p.platform == profile.platform) {
            Some(existing) => *existing = profile,
            None => self.sites.push(profile),
        }
    }

    /// Profile for `url`; the generic profile when no site claims its host.
    pub fn for_url(&self, url: &str) -> &SiteProfile {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        let Some(host) = host else {
            debug!(url, "no host in url, using generic profile");
            return &self.fallback;
        };
        self.sites
            .iter()
            .find(|p| p.matches_host(&host))
            .unwrap_or(&self.fallback)
    }

    pub fn get(&self, platform: &str) -> Option<&SiteProfile> {
        if platform == self.fallback.platform {
            return Some(&self.fallback);
        }
        self.sites.iter().find(|p| p.platform == platform)
    }

    /// Every profile, site profiles first and the fallback last.
    pub fn profiles(&self) -> impl Iterator<Item = &SiteProfile> {
        self.sites.iter().chain(std::iter::once(&self.fallback))
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
