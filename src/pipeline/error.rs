use thiserror::Error;

/// 流水线阶段，各自拥有独立的失败域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Gathering,
    Extracting,
    Aggregating,
    Writing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Gathering => write!(f, "gathering"),
            Stage::Extracting => write!(f, "extracting"),
            Stage::Aggregating => write!(f, "aggregating"),
            Stage::Writing => write!(f, "writing"),
        }
    }
}

/// 终止整次运行的类型化失败
///
/// 单个URL的提取失败不在此列：它在提取阶段内部被就地消化，只有把
/// 可用信息源数量压到阈值以下时才以`InsufficientResearch`升级。
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 主题为空或仅含空白字符
    #[error("topic must be a non-empty string")]
    EmptyTopic,

    /// 搜集阶段没有得到任何可用的候选信息源
    #[error("no usable sources found for the topic")]
    NoSourcesFound,

    /// 提取后存活的信息源不足以支撑一篇有依据的文章
    #[error("only {found} usable sources after extraction, at least {required} required")]
    InsufficientResearch { found: usize, required: usize },

    /// 模型调用耗尽重试或持续返回无效结构
    #[error("writing failed: {0}")]
    WritingFailed(String),

    /// 某个阶段超出了其时间预算
    #[error("stage {stage} exceeded its time budget")]
    Timeout { stage: Stage },

    /// 调用方中止了本次运行
    #[error("run cancelled by caller")]
    Cancelled,
}

impl PipelineError {
    /// 失败类别的稳定标识，用于服务边界的错误响应与状态记录
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::EmptyTopic => "empty_topic",
            PipelineError::NoSourcesFound => "no_sources_found",
            PipelineError::InsufficientResearch { .. } => "insufficient_research",
            PipelineError::WritingFailed(_) => "writing_failed",
            PipelineError::Timeout { .. } => "timeout",
            PipelineError::Cancelled => "cancelled",
        }
    }
}

/// 单个URL提取失败的原因
#[derive(Debug, Error, Clone)]
pub enum ExtractError {
    /// 非成功的HTTP状态
    #[error("http status {status}")]
    HttpStatus { status: u16 },

    /// 网络请求本身失败
    #[error("request failed: {0}")]
    Request(String),

    /// 抓取超时
    #[error("fetch timed out")]
    Timeout,

    /// 响应不是HTML文档
    #[error("content type is not html: {0}")]
    NotHtml(String),

    /// URL不允许抓取（非http(s)、回环或内网地址）
    #[error("unsafe url blocked")]
    UnsafeUrl,

    /// 页面可达但提取不出足量正文
    #[error("no usable text extracted")]
    EmptyContent,
}

impl ExtractError {
    /// 是否值得重试一次；确定性的失败不重试
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractError::Request(_) | ExtractError::Timeout => true,
            ExtractError::HttpStatus { status } => *status == 429 || *status >= 500,
            ExtractError::NotHtml(_) | ExtractError::UnsafeUrl | ExtractError::EmptyContent => {
                false
            }
        }
    }
}
