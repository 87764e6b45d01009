//! Robots.txt policy
//!
//! Allow/disallow matching is delegated to the robotstxt crate; the
//! `Crawl-delay` extension, which that crate ignores, is parsed here.

use robotstxt::DefaultMatcher;

/// One `User-agent` group that declared a `Crawl-delay`
#[derive(Debug, Clone, PartialEq)]
struct DelayGroup {
    /// Lowercased user-agent tokens of the group
    agents: Vec<String>,
    /// Delay in seconds
    seconds: f64,
}

/// Parsed robots.txt rules for one site
#[derive(Debug, Clone, PartialEq)]
pub struct RobotsPolicy {
    /// Raw robots.txt content; `None` means allow everything
    content: Option<String>,
    delays: Vec<DelayGroup>,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            delays: parse_crawl_delays(content),
        }
    }

    /// Creates a permissive policy
    ///
    /// This is used when robots.txt cannot be fetched or is disabled.
    pub fn allow_all() -> Self {
        Self {
            content: None,
            delays: Vec::new(),
        }
    }

    /// Checks if a URL is allowed for the given user-agent token
    ///
    /// # Arguments
    ///
    /// * `url` - Full URL or path (e.g. `https://example.edu/page` or `/page`)
    /// * `user_agent` - Product token, e.g. `ProgramScout`
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.content {
            Some(content) if !content.trim().is_empty() => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
            _ => true,
        }
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let agent = user_agent.to_lowercase();

        let specific = self.delays.iter().find(|group| {
            group
                .agents
                .iter()
                .any(|token| token != "*" && agent.contains(token.as_str()))
        });

        specific
            .or_else(|| {
                self.delays
                    .iter()
                    .find(|group| group.agents.iter().any(|token| token == "*"))
            })
            .map(|group| group.seconds)
    }
}

/// Collects `Crawl-delay` values per `User-agent` group
///
/// Consecutive `User-agent` lines form one group; the first non-agent line
/// closes the list of agents for that group.
fn parse_crawl_delays(content: &str) -> Vec<DelayGroup> {
    let mut groups = Vec::new();
    let mut agents: Vec<String> = Vec::new();
    let mut collecting_agents = false;

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !collecting_agents {
                    agents.clear();
                    collecting_agents = true;
                }
                agents.push(value.to_lowercase());
            }
            "crawl-delay" => {
                collecting_agents = false;
                if let Ok(seconds) = value.parse::<f64>() {
                    if !agents.is_empty() {
                        groups.push(DelayGroup {
                            agents: agents.clone(),
                            seconds,
                        });
                    }
                }
            }
            _ => collecting_agents = false,
        }
    }

    groups
}
