//! Energy storage and supply-trace playback.

pub mod capacitor;
