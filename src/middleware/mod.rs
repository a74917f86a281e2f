/// Middleware module
///
/// Access token authentication and static-file hit counting.

mod hit_counter;
mod jwt_middleware;

pub use hit_counter::{HitCounter, Hits};
pub use jwt_middleware::{AuthenticatedUser, JwtMiddleware};
