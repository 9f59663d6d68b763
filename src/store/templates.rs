use super::{AsyncPhase, Reducer};
use templateshare_shared::Template;

/// 模板列表状态
///
/// `loading` 只有一个，多个并发请求之间不做区分；后完成的请求覆盖先完成的。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateState {
    /// 最近一次成功拉取的列表（顺序由服务端决定）
    pub templates: Vec<Template>,
    pub selected_template: Option<Template>,
    pub loading: bool,
    pub error: Option<String>,
    /// 产生 `error` 的操作；重试时据此重跑失败的那一步
    pub failed_op: Option<TemplateOp>,
}

/// 模板相关的异步操作种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOp {
    FetchAll,
    FetchById,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateAction {
    FetchAll(AsyncPhase<Vec<Template>>),
    FetchById(AsyncPhase<Template>),
    /// 成功时携带服务端返回的新模板 id（如果有）
    Create(AsyncPhase<Option<String>>),
    /// 成功时携带被更新的模板 id
    Update(AsyncPhase<String>),
    /// 成功时携带被删除的模板 id
    Delete(AsyncPhase<String>),
    ClearError,
    SetSelected(Option<Template>),
    ClearSelected,
}

impl TemplateState {
    fn begin(&mut self) {
        self.loading = true;
        self.clear_error();
    }

    fn succeed(&mut self) {
        self.loading = false;
        self.clear_error();
    }

    fn fail(&mut self, op: TemplateOp, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.failed_op = Some(op);
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.failed_op = None;
    }

    /// 公共的三阶段处理；返回 fulfilled 的数据交给具体 action 应用
    fn settle<T>(&mut self, op: TemplateOp, phase: AsyncPhase<T>) -> Option<T> {
        match phase {
            AsyncPhase::Pending => {
                self.begin();
                None
            }
            AsyncPhase::Fulfilled(value) => {
                self.succeed();
                Some(value)
            }
            AsyncPhase::Rejected(message) => {
                self.fail(op, message);
                None
            }
            AsyncPhase::Cancelled => {
                self.loading = false;
                None
            }
        }
    }

    /// 创建页重试时是否需要重新提交
    ///
    /// 创建成功但随后的列表刷新失败时，错误来自 FetchAll，此时只能重新拉取列表。
    pub fn create_retry_resubmits(&self) -> bool {
        self.failed_op != Some(TemplateOp::FetchAll)
    }

    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }
}

impl Reducer for TemplateState {
    type Action = TemplateAction;

    fn reduce(&mut self, action: TemplateAction) {
        match action {
            TemplateAction::FetchAll(phase) => {
                if let Some(list) = self.settle(TemplateOp::FetchAll, phase) {
                    self.templates = list;
                }
            }
            TemplateAction::FetchById(phase) => {
                if let Some(template) = self.settle(TemplateOp::FetchById, phase) {
                    self.selected_template = Some(template);
                }
            }
            // 列表的刷新由 action 层在成功后重新拉取
            TemplateAction::Create(phase) => {
                self.settle(TemplateOp::Create, phase);
            }
            TemplateAction::Update(phase) => {
                self.settle(TemplateOp::Update, phase);
            }
            TemplateAction::Delete(phase) => {
                if let Some(id) = self.settle(TemplateOp::Delete, phase) {
                    self.templates.retain(|t| t.id != id);
                    if self.selected_template.as_ref().is_some_and(|t| t.id == id) {
                        self.selected_template = None;
                    }
                }
            }
            TemplateAction::ClearError => self.clear_error(),
            TemplateAction::SetSelected(template) => self.selected_template = template,
            TemplateAction::ClearSelected => self.selected_template = None,
        }
    }
}
