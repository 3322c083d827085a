//! 検索入力のデバウンス
//!
//! 入力が止まってから一定時間（参照値300ms）経ったときだけ値を確定する。
//! 新しい入力は保留中の値を置き換え、期限を延長する。
//! 時計は呼び出し側から渡すので、同期コードからもテストからも同じ規則で使える。

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// 入力を受け付ける（保留中の値は破棄）
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// 期限に達していれば保留値を取り出す
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(self.pending, Some((_, deadline)) if now >= deadline);
        if ready {
            self.flush()
        } else {
            None
        }
    }

    /// 期限を待たずに保留値を取り出す
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// 入力チャネルを読み、静止時間ごとに最後の値で commit を呼ぶ
///
/// チャネルが閉じたとき保留中の値があれば、それを確定してから終了する。
/// 単一タスク内で完結するので commit が並行に呼ばれることはない。
pub async fn run_debounced<T, F>(mut rx: mpsc::Receiver<T>, window: Duration, mut commit: F)
where
    F: FnMut(T),
{
    let mut debouncer = Debouncer::new(window);

    loop {
        let deadline = debouncer.deadline();

        tokio::select! {
            received = rx.recv() => match received {
                Some(value) => debouncer.input(value, Instant::now()),
                None => {
                    if let Some(value) = debouncer.flush() {
                        commit(value);
                    }
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(value) = debouncer.poll(Instant::now()) {
                    commit(value);
                }
            }
        }
    }

    tracing::debug!("検索入力チャネルが閉じられた");
}
