pub mod fetcher;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

#[derive(Debug, Clone, Default)]
pub struct UpstreamService;

impl UpstreamService {
    pub fn name(&self) -> &'static str {
        "upstream"
    }

    pub fn status(&self) -> &'static str {
        "ready"
    }
}
