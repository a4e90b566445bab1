//! Keyword topics and canned replies

/// Topics recognized from plain keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Services,
    Navigation,
}

impl Topic {
    pub fn reply(&self) -> &'static str {
        match self {
            Topic::Services => SERVICES_REPLY,
            Topic::Navigation => NAVIGATION_REPLY,
        }
    }
}

/// Services keywords are checked before navigation keywords.
pub fn classify(message: &str) -> Option<Topic> {
    let lower = message.to_lowercase();

    if lower.contains("service") || lower.contains("what do you offer") {
        Some(Topic::Services)
    } else if lower.contains("navigate") || lower.contains("help") {
        Some(Topic::Navigation)
    } else {
        None
    }
}

pub const SERVICES_REPLY: &str = "I'm currently experiencing connectivity issues, but I can tell you about our core services:

• **Neural Workflow Assessment** - AI algorithms with 99.7% accuracy to identify automation opportunities
• **Quantum Best Practices** - Machine learning strategies for 10x faster implementation
• **AI Risk Management** - Predictive analytics maintaining 0.1% risk factor
• **Data-Driven Case Studies** - 500+ analyzed real-world examples
• **Automated Implementation** - 24-hour deployment capability
• **AI Onboarding System** - Adaptive learning that grows with your needs

Please try again in a moment for more detailed assistance, or explore our website sections for comprehensive information.";

pub const NAVIGATION_REPLY: &str = "Hi! I'm Machan, but I'm temporarily offline. Here's how to navigate our platform:

• **Introduction** - Start here for AI workflow fundamentals
• **Workflow Guide** - Detailed implementation guidance
• **Best Practices** - Proven strategies and methodologies
• **Case Studies** - Real-world success stories
• **Risk Assessment** - Evaluation and mitigation tools
• **Implementation** - Step-by-step deployment guide

Please refresh and try again for personalized assistance!";

pub const DEFAULT_REPLY: &str = "Hi! I'm Machan, your AI assistant. I'm currently experiencing connectivity issues, so I can't access my full knowledge base or provide real-time responses.

However, I can share some basic information about our AI Workflow Hub platform based on what I know:
- We offer comprehensive automation solutions
- Our platform includes workflow assessment, best practices, and implementation guidance

For detailed and current information, I recommend:
- Exploring our website sections (Introduction, Workflow Guide, Best Practices, Case Studies, Implementation)
- Trying your question again in a moment when my connection is restored
- Browsing the navigation menu for specific topics

I apologize for the limitation and will provide much better assistance once I'm back online!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("What services do you offer?"), Some(Topic::Services));
        assert_eq!(classify("so, WHAT DO YOU OFFER"), Some(Topic::Services));
        assert_eq!(classify("How do I navigate the website?"), Some(Topic::Navigation));
        assert_eq!(classify("I need help"), Some(Topic::Navigation));
        assert_eq!(classify("What is the weather today?"), None);
    }

    #[test]
    fn test_services_win_over_navigation() {
        assert_eq!(classify("help me pick a service"), Some(Topic::Services));
    }
}
