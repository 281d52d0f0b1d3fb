pub mod agent;
pub mod output;
pub mod profiles;
pub mod providers;

pub use agent::{AgentGateway, Instruction};
pub use profiles::{AgentProfile, RecommendationKind};
