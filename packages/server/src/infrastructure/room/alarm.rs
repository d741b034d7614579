//! タイピング期限切れのタイマー
//!
//! 接続ごとに高々 1 つのタイマーを保持する。再設定すると古いタイマーは中断される。

use std::{collections::HashMap, time::Duration};

use tokio::{sync::mpsc, task::AbortHandle};

use super::RoomCommand;
use crate::domain::ConnectionId;

#[derive(Debug)]
struct Alarm {
    generation: u64,
    handle: AbortHandle,
}

/// 接続ごとのキャンセル可能なタイマー
#[derive(Debug, Default)]
pub struct TypingAlarms {
    alarms: HashMap<ConnectionId, Alarm>,
}

impl TypingAlarms {
    pub fn new() -> Self {
        Self::default()
    }

    /// `delay` 後に `TypingExpired` をルームに送るタイマーを設定する
    ///
    /// 既存のタイマーは中断される。
    pub fn arm(
        &mut self,
        connection_id: ConnectionId,
        generation: u64,
        delay: Duration,
        room: mpsc::UnboundedSender<RoomCommand>,
    ) {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // ルームが既に停止している場合は送信に失敗するが問題ない
            let _ = room.send(RoomCommand::TypingExpired {
                connection_id,
                generation,
            });
        })
        .abort_handle();

        if let Some(previous) = self.alarms.insert(connection_id, Alarm { generation, handle }) {
            previous.handle.abort();
        }
    }

    /// タイマーを中断する
    pub fn cancel(&mut self, connection_id: &ConnectionId) {
        if let Some(alarm) = self.alarms.remove(connection_id) {
            alarm.handle.abort();
        }
    }

    /// 発火済みのタイマーを忘れる
    ///
    /// 再設定後に古い世代が遅れて届いた場合は、新しいタイマーを残す。
    pub fn fired(&mut self, connection_id: &ConnectionId, generation: u64) {
        if self
            .alarms
            .get(connection_id)
            .is_some_and(|alarm| alarm.generation == generation)
        {
            self.alarms.remove(connection_id);
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, alarm) in self.alarms.drain() {
            alarm.handle.abort();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

impl Drop for TypingAlarms {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_alarm_fires_after_delay() {
        // テスト項目: 設定したタイマーは指定時間後に期限切れを送る
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut alarms = TypingAlarms::new();
        let alice = ConnectionId::generate();

        // when (操作):
        alarms.arm(alice, 1, Duration::from_secs(3), tx);
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(200)).await;

        // then (期待する結果):
        match rx.try_recv() {
            Ok(RoomCommand::TypingExpired {
                connection_id,
                generation,
            }) => {
                assert_eq!(connection_id, alice);
                assert_eq!(generation, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_supersedes_previous_alarm() {
        // テスト項目: 再設定すると古いタイマーは発火しない
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut alarms = TypingAlarms::new();
        let alice = ConnectionId::generate();
        alarms.arm(alice, 1, Duration::from_secs(3), tx.clone());

        // when (操作):
        tokio::time::sleep(Duration::from_secs(2)).await;
        alarms.arm(alice, 2, Duration::from_secs(3), tx);
        tokio::time::sleep(Duration::from_secs(10)).await;

        // then (期待する結果):
        let mut generations = Vec::new();
        while let Ok(RoomCommand::TypingExpired { generation, .. }) = rx.try_recv() {
            generations.push(generation);
        }
        assert_eq!(generations, vec![2]);
        assert_eq!(alarms.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        // テスト項目: 中断したタイマーは発火しない
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut alarms = TypingAlarms::new();
        let alice = ConnectionId::generate();
        alarms.arm(alice, 1, Duration::from_secs(3), tx);

        // when (操作):
        alarms.cancel(&alice);
        tokio::time::sleep(Duration::from_secs(10)).await;

        // then (期待する結果):
        assert!(rx.try_recv().is_err());
        assert!(alarms.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_forgets_only_matching_generation() {
        // テスト項目: 発火したタイマーは忘れられ、古い世代の通知では新しいタイマーは残る
        // given (前提条件):
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut alarms = TypingAlarms::new();
        let alice = ConnectionId::generate();
        alarms.arm(alice, 1, Duration::from_secs(3), tx.clone());
        alarms.arm(alice, 2, Duration::from_secs(3), tx);

        // when (操作):
        alarms.fired(&alice, 1);

        // then (期待する結果):
        assert_eq!(alarms.len(), 1);
        alarms.fired(&alice, 2);
        assert!(alarms.is_empty());
    }
}
