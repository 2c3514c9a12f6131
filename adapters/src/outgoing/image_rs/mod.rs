pub mod webp_codec;
