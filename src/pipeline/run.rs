use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::pipeline::error::PipelineError;

/// 流水线状态机的状态
///
/// 成功路径上严格单向推进：Gathering → Extracting → Aggregating →
/// Writing → Done；任一阶段失败直接进入Failed，绝不返回半成品文章。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Gathering,
    Extracting,
    Aggregating,
    Writing,
    Done,
    Failed { kind: &'static str },
}

impl PipelineState {
    /// 成功路径上的序号，Failed不参与排序
    fn order(&self) -> u8 {
        match self {
            PipelineState::Gathering => 0,
            PipelineState::Extracting => 1,
            PipelineState::Aggregating => 2,
            PipelineState::Writing => 3,
            PipelineState::Done => 4,
            PipelineState::Failed { .. } => u8::MAX,
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Gathering => write!(f, "gathering"),
            PipelineState::Extracting => write!(f, "extracting"),
            PipelineState::Aggregating => write!(f, "aggregating"),
            PipelineState::Writing => write!(f, "writing"),
            PipelineState::Done => write!(f, "done"),
            PipelineState::Failed { kind } => write!(f, "failed({})", kind),
        }
    }
}

/// 单次请求的流水线运行状态
///
/// 由协调器独占持有，生命周期不超过一次请求，绝不跨并发运行共享。
#[derive(Debug)]
pub struct PipelineRun {
    pub id: Uuid,
    pub topic: String,
    pub state: PipelineState,
    pub started_at: DateTime<Utc>,
}

impl PipelineRun {
    /// 收到主题后进入初始状态Gathering
    pub fn new(topic: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            state: PipelineState::Gathering,
            started_at: Utc::now(),
        }
    }

    /// 向前推进到下一个状态；逆向迁移是编程错误
    pub fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            next.order() > self.state.order(),
            "pipeline state may only move forward: {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    /// 记录终止性失败
    pub fn fail(&mut self, error: &PipelineError) {
        self.state = PipelineState::Failed { kind: error.kind() };
    }

    /// 是否已处于终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            PipelineState::Done | PipelineState::Failed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_gathering() {
        let run = PipelineRun::new("rust async");
        assert_eq!(run.state, PipelineState::Gathering);
        assert!(!run.is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        let mut run = PipelineRun::new("rust async");
        run.advance(PipelineState::Extracting);
        run.advance(PipelineState::Aggregating);
        run.advance(PipelineState::Writing);
        run.advance(PipelineState::Done);
        assert!(run.is_terminal());
    }

    #[test]
    fn test_failure_records_kind() {
        let mut run = PipelineRun::new("rust async");
        run.fail(&PipelineError::NoSourcesFound);
        assert_eq!(
            run.state,
            PipelineState::Failed {
                kind: "no_sources_found"
            }
        );
        assert!(run.is_terminal());
    }

    #[test]
    #[should_panic(expected = "forward")]
    #[cfg(debug_assertions)]
    fn test_backward_transition_panics() {
        let mut run = PipelineRun::new("rust async");
        run.advance(PipelineState::Writing);
        run.advance(PipelineState::Extracting);
    }
}
