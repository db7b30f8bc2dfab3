pub mod invitations;
pub mod requesters;
