/// Input rate-limit parameters, per connection.
///
/// Player input is the only high-frequency inbound event; the bucket
/// allows the nominal 60 inputs per second plus a small burst.
pub const INPUTS_PER_SECOND: f64 = 60.0;

/// Extra inputs tolerated in a burst before throttling kicks in.
pub const INPUT_BURST: f64 = 10.0;
