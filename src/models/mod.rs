pub mod reward;
pub mod ride;
pub mod stats;
pub mod tokens;
pub mod user;

pub use reward::{NewReward, Reward, RewardStatus, UserReward};
pub use ride::{NewRide, Ride, RidePatch, RideStatus};
pub use stats::{StatsPatch, UserStats};
pub use tokens::{TokenBalance, TokensPatch};
pub use user::{Location, NewUser, Role, User, UserPatch};
