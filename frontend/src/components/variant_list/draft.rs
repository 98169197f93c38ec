//! 新建可售变体的草稿

use inventory_shared::{NewProductVariant, NewVariantOption, Product, derive_sku};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariantDraft {
    pub name: String,
    pub options: Vec<String>,
}

impl Default for NewVariantDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            options: vec![String::new()],
        }
    }
}

impl NewVariantDraft {
    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    pub fn remove_option(&mut self, index: usize) {
        if index < self.options.len() {
            self.options.remove(index);
        }
    }

    pub fn set_option(&mut self, index: usize, value: String) {
        if let Some(option) = self.options.get_mut(index) {
            *option = value;
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// 生成请求，SKU 为 `{商品编码}-{变体名}`，空白选项被忽略
    pub fn to_request(&self, product: &Product) -> Option<NewProductVariant> {
        if !self.can_submit() {
            return None;
        }
        let name = self.name.trim().to_string();
        let options = self
            .options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
            .map(|option| NewVariantOption {
                name: option.to_string(),
                value: option.to_string(),
            })
            .collect();

        Some(NewProductVariant {
            product: product.id,
            sku: derive_sku(&product.code, &name),
            name,
            options,
        })
    }
}
