//! 请求序号守卫
//!
//! 轮询与手动刷新可能并发；只有最后发出的请求可以写入状态。

/// 一次请求的序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发出新请求，之前的所有票据随即过期
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// 使所有在途请求失效（如页面卸载）
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let mut seq = RequestSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(second > first);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_invalidate_supersedes_in_flight() {
        let mut seq = RequestSequencer::new();
        let ticket = seq.begin();
        seq.invalidate();
        assert!(!seq.is_current(ticket));
    }
}
