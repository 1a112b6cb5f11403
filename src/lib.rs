#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use refract_mapper as mapper;
pub use refract_utils as utils;
