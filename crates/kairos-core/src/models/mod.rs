mod data_source;
mod result_record;
mod risk;
mod session;

pub use data_source::{
    normalize_tag, normalize_tags, AccessTier, DataSource, SourceAccess, SourceType,
};
pub use result_record::{content_hash, ResultRecord};
pub use risk::{RiskAssessment, RiskEvent, RiskLevel, RiskSource, RiskTrend};
pub use session::{SessionContext, SessionProtocol, SessionType};
