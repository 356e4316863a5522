//! Color correction module
//!
//! White balance on the linear working image, then tone mapping to 8 bits.

pub mod tone;
pub mod white_balance;

pub use tone::{DISPLAY_MAX, flip_vertical, tone_map, tone_map_sample};
pub use white_balance::{
    ChannelStats, GAIN_EPSILON, GainTriple, WhiteBalanceMethod, apply_gains, channel_maxima,
    channel_means, gray_world_gains, max_white_gains, plane_mean, white_balance,
};
