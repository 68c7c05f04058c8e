//! Chart-of-accounts selection for amortization journals.

use std::collections::BTreeMap;

use claimright_domain::{Account, ClaimRight, ClaimType};

/// Accounts debited and credited when one period of a claim is recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPair {
    pub debit: Account,
    pub credit: Account,
}

/// Chooses posting accounts for a claim. Account codes are configuration; the
/// posting engine only relies on getting one debit and one credit account.
pub trait AccountMapper: Send + Sync {
    fn accounts_for(&self, claim: &ClaimRight) -> AccountPair;
}

/// Account mapping driven by a small chart of accounts.
///
/// Asset claims debit an expense account (picked by ledger category when
/// configured) and credit the prepaid asset. Liability claims debit deferred
/// revenue and credit a revenue account; claims derived from a ledger entry use
/// the ledger revenue account instead of the default one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartAccountMapper {
    pub prepaid_asset: Account,
    pub deferred_revenue: Account,
    pub default_expense: Account,
    pub default_revenue: Account,
    pub ledger_revenue: Account,
    category_expense: BTreeMap<String, Account>,
}

const CATEGORY_EXPENSE_DEFAULTS: &[(&str, &str, &str)] = &[
    ("Food & Beverage", "5100", "Food & Beverage Expense"),
    ("Transportation", "5200", "Transportation Expense"),
    ("Accommodation", "5300", "Accommodation Expense"),
    ("Office Supplies", "5400", "Office Supplies Expense"),
    ("Utilities", "5500", "Utilities Expense"),
    ("Healthcare", "5600", "Healthcare Expense"),
    ("Entertainment", "5700", "Entertainment Expense"),
    ("Retail/Shopping", "5800", "Retail Expense"),
    ("Professional Services", "5900", "Professional Services Expense"),
    ("Software/Technology", "5910", "Software & Technology Expense"),
    ("Travel", "5920", "Travel Expense"),
    ("Education", "5930", "Education Expense"),
    ("General Expense", "5990", "General Expense"),
];

impl Default for ChartAccountMapper {
    fn default() -> Self {
        let mut mapper = Self::new(
            Account::new("1400", "Prepaid Expenses"),
            Account::new("2400", "Deferred Revenue"),
            Account::new("5990", "General Expense"),
            Account::new("4100", "Sales Revenue"),
            Account::new("4200", "Service Revenue"),
        );
        for (category, code, name) in CATEGORY_EXPENSE_DEFAULTS {
            mapper.set_category_expense(category, Account::new(*code, *name));
        }
        mapper
    }
}

impl ChartAccountMapper {
    /// Builds a mapper with no category-specific expense accounts.
    pub fn new(
        prepaid_asset: Account,
        deferred_revenue: Account,
        default_expense: Account,
        default_revenue: Account,
        ledger_revenue: Account,
    ) -> Self {
        Self {
            prepaid_asset,
            deferred_revenue,
            default_expense,
            default_revenue,
            ledger_revenue,
            category_expense: BTreeMap::new(),
        }
    }

    pub fn set_category_expense(&mut self, category: &str, account: Account) {
        self.category_expense.insert(category_key(category), account);
    }

    pub fn with_category_expense(mut self, category: &str, account: Account) -> Self {
        self.set_category_expense(category, account);
        self
    }

    /// Expense account for a ledger category, falling back to the default.
    pub fn expense_for(&self, category: Option<&str>) -> &Account {
        category
            .and_then(|category| self.category_expense.get(&category_key(category)))
            .unwrap_or(&self.default_expense)
    }
}

impl AccountMapper for ChartAccountMapper {
    fn accounts_for(&self, claim: &ClaimRight) -> AccountPair {
        match claim.claim_type {
            ClaimType::AssetClaim => AccountPair {
                debit: self.expense_for(claim.category.as_deref()).clone(),
                credit: self.prepaid_asset.clone(),
            },
            ClaimType::LiabilityClaim => AccountPair {
                debit: self.deferred_revenue.clone(),
                credit: if claim.ledger_entry_id.is_some() {
                    self.ledger_revenue.clone()
                } else {
                    self.default_revenue.clone()
                },
            },
        }
    }
}

fn category_key(category: &str) -> String {
    category.trim().to_lowercase()
}
