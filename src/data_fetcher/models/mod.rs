pub mod category;
pub mod schedule;
pub mod stats;
pub mod table;
pub mod teams;

pub use category::Category;
pub use schedule::{GameDate, LeagueSchedule, ScheduleResponse, ScheduleTeam, ScheduledGame};
pub use stats::{Extraction, ResultSet};
pub use table::Table;
pub use teams::{NBA_TEAMS, Team, find_by_abbreviation};
