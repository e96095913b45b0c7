use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::ProductRepository;
use crate::domain::product::{Product, ProductInput};

pub struct ProductService<P> {
    repo: P,
    max_page_size: i64,
}

impl<P: ProductRepository> ProductService<P> {
    pub fn new(repo: P, max_page_size: i64) -> Self {
        Self {
            repo,
            max_page_size,
        }
    }

    /// Active products only, ordered by name.
    pub fn list_products(&self, page: i64, limit: i64) -> Result<Page<Product>, DomainError> {
        let request = PageRequest::new(page, limit, self.max_page_size)?;
        let list = self.repo.list_active(request)?;
        Ok(Page::from_list(request, list))
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        let product = self.repo.create(input.validate()?)?;
        log::info!(
            "Created product {} '{}' (price {}, stock {})",
            product.id,
            product.name,
            product.price,
            product.stock
        );
        Ok(product)
    }
}
