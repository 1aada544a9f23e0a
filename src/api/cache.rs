use rand::Rng;

/// `Cache-Control` policy for served feeds. The optional jitter spreads
/// the expiry of feeds that were fetched at the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: u64,
    pub jitter: Option<u64>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: 60 * 60,
            jitter: Some(15 * 60),
        }
    }
}

impl CachePolicy {
    pub fn max_age<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let Some(jitter) = self.jitter else {
            return self.max_age;
        };
        let offset = rng.gen_range(0..=jitter);
        if rng.gen_bool(0.5) {
            self.max_age.saturating_sub(offset)
        } else {
            self.max_age.saturating_add(offset)
        }
    }

    pub fn header_value<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        format!("max-age={}, must-revalidate", self.max_age(rng))
    }
}
