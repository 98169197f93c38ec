//! 出入库表单状态
//!
//! 入库与出库共用同一个表单，只在方向和出库上限检查上不同。
//! 上限检查基于最后一次拉取到的库存，只作提示，服务端会再次校验。

use std::str::FromStr;

use inventory_shared::{StockTransactionRequest, TransactionType, VariantId};
use rust_decimal::Decimal;

pub const REQUIRED: &str = "Required";
pub const NOT_A_NUMBER: &str = "Must be a number";
pub const NOT_POSITIVE: &str = "Must be positive";
pub const EXCEEDS_AVAILABLE: &str = "Cannot remove more than available stock";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockErrors {
    pub variant: Option<&'static str>,
    pub quantity: Option<&'static str>,
}

impl StockErrors {
    pub fn is_empty(&self) -> bool {
        self.variant.is_none() && self.quantity.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockForm {
    pub direction: TransactionType,
    pub variant: Option<VariantId>,
    pub quantity: String,
    pub notes: String,
    /// 从列表页的按钮进入时变体被锁定，不能再更换
    pub locked: bool,
    submitted: bool,
}

impl StockForm {
    pub fn new(direction: TransactionType) -> Self {
        Self {
            direction,
            variant: None,
            quantity: String::new(),
            notes: String::new(),
            locked: false,
            submitted: false,
        }
    }

    /// 预选并锁定变体
    pub fn preselected(direction: TransactionType, variant: VariantId) -> Self {
        Self {
            variant: Some(variant),
            locked: true,
            ..Self::new(direction)
        }
    }

    pub fn set_variant(&mut self, variant: Option<VariantId>) {
        if !self.locked {
            self.variant = variant;
        }
    }

    /// 成功提交后清空输入，锁定的变体保留
    pub fn reset(&mut self) {
        *self = if self.locked {
            match self.variant {
                Some(variant) => Self::preselected(self.direction, variant),
                None => Self::new(self.direction),
            }
        } else {
            Self::new(self.direction)
        };
    }

    /// 校验表单；`available` 为所选变体最后一次拉取到的库存，未知按 0 处理
    pub fn validate(&self, available: Option<Decimal>) -> StockErrors {
        let variant = self.variant.is_none().then_some(REQUIRED);

        let raw = self.quantity.trim();
        let quantity = if raw.is_empty() {
            Some(REQUIRED)
        } else {
            match Decimal::from_str(raw) {
                Err(_) => Some(NOT_A_NUMBER),
                Ok(q) if q <= Decimal::ZERO => Some(NOT_POSITIVE),
                Ok(q)
                    if self.direction == TransactionType::Out
                        && q > available.unwrap_or(Decimal::ZERO) =>
                {
                    Some(EXCEEDS_AVAILABLE)
                }
                Ok(_) => None,
            }
        };

        StockErrors { variant, quantity }
    }

    /// 提交过一次之后才展示错误
    pub fn visible_errors(&self, available: Option<Decimal>) -> StockErrors {
        if self.submitted {
            self.validate(available)
        } else {
            StockErrors::default()
        }
    }

    /// 校验通过时生成请求
    pub fn prepare(&mut self, available: Option<Decimal>) -> Option<StockTransactionRequest> {
        self.submitted = true;
        if !self.validate(available).is_empty() {
            return None;
        }
        let product_variant = self.variant?;
        let quantity = Decimal::from_str(self.quantity.trim()).ok()?;
        Some(StockTransactionRequest {
            product_variant,
            quantity,
            transaction_type: self.direction,
            notes: self.notes.trim().to_string(),
        })
    }
}

pub fn success_message(direction: TransactionType) -> &'static str {
    match direction {
        TransactionType::In => "Stock added successfully",
        TransactionType::Out => "Stock removed successfully",
    }
}

pub fn failure_message(direction: TransactionType) -> &'static str {
    match direction {
        TransactionType::In => "Failed to add stock",
        TransactionType::Out => "Failed to remove stock",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn removal(quantity: &str) -> StockForm {
        let mut form = StockForm::preselected(TransactionType::Out, Uuid::from_u128(1));
        form.quantity = quantity.to_string();
        form
    }

    #[test]
    fn quantity_rules() {
        let form = StockForm::new(TransactionType::In);
        assert_eq!(form.validate(None).quantity, Some(REQUIRED));
        assert_eq!(form.validate(None).variant, Some(REQUIRED));

        let mut form = StockForm::preselected(TransactionType::In, Uuid::from_u128(1));
        form.quantity = "abc".to_string();
        assert_eq!(form.validate(None).quantity, Some(NOT_A_NUMBER));
        form.quantity = "0".to_string();
        assert_eq!(form.validate(None).quantity, Some(NOT_POSITIVE));
        form.quantity = "-2".to_string();
        assert_eq!(form.validate(None).quantity, Some(NOT_POSITIVE));
        form.quantity = "2.5".to_string();
        assert!(form.validate(None).is_empty());
    }

    #[test]
    fn removal_is_capped_by_last_known_stock() {
        let mut form = removal("6");
        assert!(form.prepare(Some(Decimal::from(5))).is_none());
        assert_eq!(
            form.visible_errors(Some(Decimal::from(5))).quantity,
            Some(EXCEEDS_AVAILABLE)
        );
        assert!(form.prepare(Some(Decimal::from(6))).is_some());
    }

    #[test]
    fn unknown_stock_blocks_any_removal() {
        assert_eq!(removal("1").validate(None).quantity, Some(EXCEEDS_AVAILABLE));
    }

    #[test]
    fn additions_are_not_capped() {
        let mut form = StockForm::preselected(TransactionType::In, Uuid::from_u128(1));
        form.quantity = "1000".to_string();
        form.notes = "  restock ".to_string();
        let request = form.prepare(Some(Decimal::ZERO)).unwrap();
        assert_eq!(request.quantity, Decimal::from(1000));
        assert_eq!(request.notes, "restock");
        assert_eq!(request.transaction_type, TransactionType::In);
    }

    #[test]
    fn errors_stay_hidden_until_first_submit() {
        let mut form = StockForm::new(TransactionType::In);
        assert!(form.visible_errors(None).is_empty());
        assert!(form.prepare(None).is_none());
        assert_eq!(form.visible_errors(None).variant, Some(REQUIRED));
    }

    #[test]
    fn reset_keeps_locked_variant() {
        let mut form = removal("3");
        form.set_variant(Some(Uuid::from_u128(2)));
        assert_eq!(form.variant, Some(Uuid::from_u128(1)));
        form.reset();
        assert_eq!(form.variant, Some(Uuid::from_u128(1)));
        assert!(form.quantity.is_empty());

        let mut free = StockForm::new(TransactionType::In);
        free.set_variant(Some(Uuid::from_u128(2)));
        free.reset();
        assert_eq!(free.variant, None);
    }
}
