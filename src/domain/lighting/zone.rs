//! ゾーンからコントローラーへの対応付け
//!
//! 対応表は持たず、ゾーン ID から機械的にコントローラー ID を導出する。

use super::command::ControllerId;

/// 1ゾーンあたりのセグメントは常に先頭の1つだけを扱う
pub const DEFAULT_SEGMENT_INDEX: u32 = 0;

const CONTROLLER_PREFIX: &str = "controller-";

/// ゾーンの解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTarget {
    pub controller: ControllerId,
    pub segment_index: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneResolver;

impl ZoneResolver {
    pub fn new() -> Self {
        Self
    }

    /// ゾーン ID を `controller-<zone>` とセグメント 0 に解決する
    ///
    /// 入力の検証や存在確認は行わない。
    pub fn resolve(&self, zone_id: &str) -> ZoneTarget {
        ZoneTarget {
            controller: ControllerId::new(format!("{CONTROLLER_PREFIX}{zone_id}")),
            segment_index: DEFAULT_SEGMENT_INDEX,
        }
    }
}
