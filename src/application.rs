//! アプリケーション層
//!
//! HTTP リクエストから組み立てたコマンドを、ブローカーまたはデバイスへ届けるユースケース

pub mod use_cases;
