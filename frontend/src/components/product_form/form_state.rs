//! 商品表单状态管理模块
//!
//! 将商品表单整合为一个纯数据结构 `ProductForm`，负责：
//! - 字段值与 touched 标记的持有
//! - 变体/选项的动态增删（按下标）
//! - 本地校验与编码唯一性检查的结果合并
//! - 生成提交内容
//!
//! 不依赖 DOM，组件层把它放进 `RwSignal` 中驱动界面。

use inventory_shared::{OptionValue, Product, ProductId, VariantDefinition};

use crate::api::ProductSubmission;

pub const NAME_REQUIRED: &str = "Product name is required";
pub const CODE_REQUIRED: &str = "Product code is required";
pub const VARIANT_NAME_REQUIRED: &str = "Variant name is required";
pub const OPTION_VALUE_REQUIRED: &str = "Option value is required";
pub const OPTIONS_REQUIRED: &str = "At least one option is required";
pub const CODE_TAKEN: &str = "This Product Code is already in use";
pub const CODE_CHECK_FAILED: &str = "Error validating code";

/// 带 touched 标记的文本字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    pub touched: bool,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            touched: false,
        }
    }

    /// 仅包含空白也视为空
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn trimmed(&self) -> String {
        self.value.trim().to_string()
    }
}

/// 单个变体的草稿：名称 + 选项列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantDraft {
    pub name: TextField,
    pub options: Vec<TextField>,
}

impl VariantDraft {
    /// 新增的变体带一个空选项
    pub fn blank() -> Self {
        Self {
            name: TextField::default(),
            options: vec![TextField::default()],
        }
    }

    fn from_definition(definition: &VariantDefinition) -> Self {
        let mut options: Vec<TextField> = definition
            .options
            .iter()
            .map(|option| TextField::new(option.value.clone()))
            .collect();
        if options.is_empty() {
            options.push(TextField::default());
        }
        Self {
            name: TextField::new(definition.name.clone()),
            options,
        }
    }

    fn touch_all(&mut self) {
        self.name.touched = true;
        for option in &mut self.options {
            option.touched = true;
        }
    }

    fn to_definition(&self) -> VariantDefinition {
        VariantDefinition {
            id: None,
            name: self.name.trimmed(),
            options: self
                .options
                .iter()
                .map(|option| OptionValue::new(option.trimmed()))
                .collect(),
        }
    }
}

/// 图片字段
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ImageField<F> {
    #[default]
    None,
    /// 服务端已有的图片（只展示文件名）
    Existing(String),
    /// 用户新选择的文件
    Selected { name: String, file: F },
}

impl<F> ImageField<F> {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            ImageField::None => None,
            ImageField::Existing(name) => Some(name),
            ImageField::Selected { name, .. } => Some(name),
        }
    }
}

/// 编码唯一性检查的状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodeAvailability {
    #[default]
    Unchecked,
    Checking,
    Available,
    Taken,
    /// 检查请求失败，只提示不阻止提交
    CheckFailed,
}

/// 一次编码检查的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheckOutcome {
    Available,
    Taken,
    /// 请求失败
    Failed,
}

/// 一次编码检查请求的凭证
///
/// 只有序号等于最新序号的结果才会被采纳，后发先至的旧结果被丢弃。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCheckTicket {
    pub seq: u64,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantErrors {
    pub name: Option<&'static str>,
    /// 与 `options` 一一对应
    pub options: Vec<Option<&'static str>>,
    /// 选项列表为空
    pub missing_options: Option<&'static str>,
}

impl VariantErrors {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.missing_options.is_none() && self.options.iter().all(Option::is_none)
    }
}

/// 校验结果（不考虑 touched，展示时再过滤）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<&'static str>,
    pub code: Option<&'static str>,
    pub variants: Vec<VariantErrors>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.code.is_none() && self.variants.iter().all(VariantErrors::is_empty)
    }
}

/// 新建还是编辑
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit {
        id: ProductId,
        original_code: String,
    },
}

/// 商品表单
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm<F> {
    mode: FormMode,
    pub name: TextField,
    pub code: TextField,
    pub tax_code: String,
    pub is_favourite: bool,
    pub active: bool,
    pub image: ImageField<F>,
    pub variants: Vec<VariantDraft>,
    code_check: CodeAvailability,
    check_seq: u64,
    errors: FormErrors,
}

impl<F: Clone> ProductForm<F> {
    /// 新建商品的空表单
    pub fn create() -> Self {
        Self::seeded(FormMode::Create)
    }

    /// 用已有商品填充表单
    pub fn edit(product: &Product) -> Self {
        let mut form = Self::seeded(FormMode::Edit {
            id: product.id,
            original_code: product.code.clone(),
        });
        form.name = TextField::new(product.name.clone());
        form.code = TextField::new(product.code.clone());
        form.tax_code = product.tax_code.clone().unwrap_or_default();
        form.is_favourite = product.is_favourite;
        form.active = product.active;
        form.image = product
            .image_file_name()
            .map(|name| ImageField::Existing(name.to_string()))
            .unwrap_or_default();
        if !product.variants.is_empty() {
            form.variants = product
                .variants
                .iter()
                .map(VariantDraft::from_definition)
                .collect();
        }
        form.code_check = CodeAvailability::Available;
        form.validate();
        form
    }

    fn seeded(mode: FormMode) -> Self {
        let mut form = Self {
            mode,
            name: TextField::default(),
            code: TextField::default(),
            tax_code: String::new(),
            is_favourite: false,
            active: true,
            image: ImageField::None,
            variants: vec![VariantDraft::blank()],
            code_check: CodeAvailability::Unchecked,
            check_seq: 0,
            errors: FormErrors::default(),
        };
        form.validate();
        form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn product_id(&self) -> Option<ProductId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit { id, .. } => Some(*id),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn code_check(&self) -> CodeAvailability {
        self.code_check
    }

    // =========================================================
    // 标量字段
    // =========================================================

    pub fn set_name(&mut self, value: String) {
        self.name.value = value;
        self.validate();
    }

    /// 修改编码，需要远程检查时返回检查凭证
    ///
    /// 空编码不检查；编辑模式下与原编码相同视为可用，不发请求。
    pub fn set_code(&mut self, value: String) -> Option<CodeCheckTicket> {
        self.code.value = value;
        // 任何修改都会使进行中的检查作废
        self.check_seq += 1;

        let code = self.code.trimmed();
        let ticket = if code.is_empty() {
            self.code_check = CodeAvailability::Unchecked;
            None
        } else if matches!(&self.mode, FormMode::Edit { original_code, .. } if original_code.trim() == code)
        {
            self.code_check = CodeAvailability::Available;
            None
        } else {
            self.code_check = CodeAvailability::Checking;
            Some(CodeCheckTicket {
                seq: self.check_seq,
                code,
            })
        };

        self.validate();
        ticket
    }

    /// 合并编码检查结果
    ///
    /// 返回结果是否被采纳。
    pub fn apply_code_check(
        &mut self,
        ticket: &CodeCheckTicket,
        outcome: CodeCheckOutcome,
    ) -> bool {
        if ticket.seq != self.check_seq {
            return false;
        }
        self.code_check = match outcome {
            CodeCheckOutcome::Taken => CodeAvailability::Taken,
            CodeCheckOutcome::Available => CodeAvailability::Available,
            CodeCheckOutcome::Failed => CodeAvailability::CheckFailed,
        };
        self.validate();
        true
    }

    pub fn set_tax_code(&mut self, value: String) {
        self.tax_code = value;
    }

    pub fn set_favourite(&mut self, value: bool) {
        self.is_favourite = value;
    }

    pub fn set_active(&mut self, value: bool) {
        self.active = value;
    }

    pub fn select_image(&mut self, name: String, file: F) {
        self.image = ImageField::Selected { name, file };
    }

    pub fn blur_name(&mut self) {
        self.name.touched = true;
    }

    pub fn blur_code(&mut self) {
        self.code.touched = true;
    }

    // =========================================================
    // 变体与选项
    // =========================================================

    /// 追加一个变体（带一个空选项）
    pub fn add_variant(&mut self) {
        self.variants.push(VariantDraft::blank());
        self.validate();
    }

    pub fn remove_variant(&mut self, index: usize) {
        if index < self.variants.len() {
            self.variants.remove(index);
            self.validate();
        }
    }

    pub fn set_variant_name(&mut self, index: usize, value: String) {
        if let Some(variant) = self.variants.get_mut(index) {
            variant.name.value = value;
            self.validate();
        }
    }

    pub fn blur_variant_name(&mut self, index: usize) {
        if let Some(variant) = self.variants.get_mut(index) {
            variant.name.touched = true;
        }
    }

    pub fn add_option(&mut self, variant: usize) {
        if let Some(variant) = self.variants.get_mut(variant) {
            variant.options.push(TextField::default());
            self.validate();
        }
    }

    /// 删除选项；删除最后一个后列表保持为空，由校验提示至少需要一个选项
    pub fn remove_option(&mut self, variant: usize, option: usize) {
        if let Some(variant) = self.variants.get_mut(variant) {
            if option < variant.options.len() {
                variant.options.remove(option);
                self.validate();
            }
        }
    }

    pub fn set_option_value(&mut self, variant: usize, option: usize, value: String) {
        if let Some(field) = self
            .variants
            .get_mut(variant)
            .and_then(|v| v.options.get_mut(option))
        {
            field.value = value;
            self.validate();
        }
    }

    pub fn blur_option(&mut self, variant: usize, option: usize) {
        if let Some(field) = self
            .variants
            .get_mut(variant)
            .and_then(|v| v.options.get_mut(option))
        {
            field.touched = true;
        }
    }

    // =========================================================
    // 校验与展示
    // =========================================================

    fn validate(&mut self) {
        let name = self.name.is_blank().then_some(NAME_REQUIRED);
        let code = if self.code.is_blank() {
            Some(CODE_REQUIRED)
        } else {
            match self.code_check {
                CodeAvailability::Taken => Some(CODE_TAKEN),
                _ => None,
            }
        };
        let variants = self
            .variants
            .iter()
            .map(|variant| VariantErrors {
                name: variant.name.is_blank().then_some(VARIANT_NAME_REQUIRED),
                options: variant
                    .options
                    .iter()
                    .map(|option| option.is_blank().then_some(OPTION_VALUE_REQUIRED))
                    .collect(),
                missing_options: variant.options.is_empty().then_some(OPTIONS_REQUIRED),
            })
            .collect();

        self.errors = FormErrors {
            name,
            code,
            variants,
        };
    }

    pub fn name_error(&self) -> Option<&'static str> {
        self.errors.name.filter(|_| self.name.touched)
    }

    /// 编码错误：必填错误需 touched 才展示；编码已占用与检查失败总是展示
    pub fn code_error(&self) -> Option<&'static str> {
        match self.code_check {
            CodeAvailability::Taken if !self.code.is_blank() => Some(CODE_TAKEN),
            CodeAvailability::CheckFailed if !self.code.is_blank() => Some(CODE_CHECK_FAILED),
            _ => self.errors.code.filter(|_| self.code.touched),
        }
    }

    pub fn variant_name_error(&self, index: usize) -> Option<&'static str> {
        let touched = self.variants.get(index)?.name.touched;
        self.errors.variants.get(index)?.name.filter(|_| touched)
    }

    pub fn option_error(&self, variant: usize, option: usize) -> Option<&'static str> {
        let touched = self.variants.get(variant)?.options.get(option)?.touched;
        self.errors
            .variants
            .get(variant)?
            .options
            .get(option)
            .copied()
            .flatten()
            .filter(|_| touched)
    }

    /// 选项列表为空的提示不依赖 touched
    pub fn missing_options_error(&self, variant: usize) -> Option<&'static str> {
        self.errors.variants.get(variant)?.missing_options
    }

    // =========================================================
    // 提交
    // =========================================================

    fn touch_all(&mut self) {
        self.name.touched = true;
        self.code.touched = true;
        for variant in &mut self.variants {
            variant.touch_all();
        }
    }

    /// 标记所有字段为 touched 并校验，通过时返回提交内容
    ///
    /// 校验失败时表单内容保持不变。
    pub fn prepare_submission(&mut self) -> Option<ProductSubmission<F>> {
        self.touch_all();
        self.validate();
        if !self.errors.is_empty() {
            return None;
        }

        let image = match &self.image {
            ImageField::Selected { file, .. } => Some(file.clone()),
            ImageField::None | ImageField::Existing(_) => None,
        };

        Some(ProductSubmission {
            name: self.name.trimmed(),
            code: self.code.trimmed(),
            tax_code: self.tax_code.trim().to_string(),
            is_favourite: self.is_favourite,
            active: self.active,
            variants: self.variants.iter().map(VariantDraft::to_definition).collect(),
            image,
        })
    }
}

#[cfg(test)]
mod tests;
