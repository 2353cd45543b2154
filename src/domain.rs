//! ドメイン層
//!
//! 照明コマンドの組み立てと、ブローカー・デバイスへの送出口を定義する層

pub mod broker;
pub mod errors;
pub mod lighting;
pub mod proxy;
