#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use rx_cfg as cfg;
pub use rx_ptr as ptr;
pub use rx_reflect as reflect;
pub use rx_utils as utils;
