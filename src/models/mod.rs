pub mod activity;
pub mod link;
pub mod participant;
pub mod trip;

pub use activity::{group_by_date, Activity, ActivityDay, NewActivity};
pub use link::{Link, NewLink};
pub use participant::{Participant, ParticipantStatus};
pub use trip::{NewTrip, Trip, TripStatus, TripUpdate};
