// Campaign intake: validate the inbound form row and run the report pipeline.

pub mod handlers;
pub mod intake;
pub mod pipeline;
