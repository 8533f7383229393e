//! The yearly pipeline
//!
//! Stages run in a fixed order over one ledger; later stages read balances
//! left by earlier ones (conversions only happen when the income stages left
//! no taxed income, the solvency check looks at savings after the sweep).

use super::engine::Simulation;
use super::state::YearState;
use super::summary::YearSummary;
use super::withdrawal::withdraw_proportionally;
use crate::assumptions::FilingStatus;
use crate::ledger::{Accounts, Category, Owner};
use crate::policy::MarketSampler;

/// RMDs start in the year a person turns this age
const RMD_START_AGE: i32 = 73;

/// Result of one pipeline pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearOutcome {
    Solvent,
    /// Savings stayed at or below zero after every shortfall transfer
    Insolvent { year: i32 },
}

impl Simulation {
    /// Run every stage for `state.year`, then advance the year
    ///
    /// An insolvent year stops after the solvency check: no market
    /// adjustment is applied and the year is not advanced.
    pub(super) fn simulate_year(
        &self,
        state: &mut YearState,
        market: &mut MarketSampler<'_>,
        row: &mut YearSummary,
    ) -> YearOutcome {
        reset_transients(&mut state.accounts);
        self.job_income(state, row);
        self.socsec_income(state, row);
        self.expenses(state, row);
        self.required_minimum_distributions(state, row);
        self.roth_conversions(state, row);
        self.voluntary_distributions(state, row);
        self.calculate_taxes(state, row);
        row.swept = sweep_into_savings(&mut state.accounts);

        if let YearOutcome::Insolvent { year } = self.ensure_minimum_savings(state, row) {
            return YearOutcome::Insolvent { year };
        }

        self.apply_market(state, market, row);
        self.record_balances(state, row);
        state.advance_year();
        YearOutcome::Solvent
    }

    fn job_income(&self, state: &mut YearState, row: &mut YearSummary) {
        for (id, person) in self.policy.family.iter() {
            if person.retired(state.year) {
                log::debug!("{} does not work", person);
                continue;
            }

            let gross = person.salary;
            let limit = self.assumptions.contributions.limit(person.age(state.year));
            let roth = gross.min(limit).max(0.0);
            let taxed = gross - roth;
            log::debug!(
                "{} salary = ${:.0} -> ${:.0} roth + ${:.0} taxed",
                person,
                gross,
                roth,
                taxed
            );

            state.accounts.get(Category::Roth, Owner::Person(id)).add(roth);
            state.accounts.shared(Category::TaxedIncome).add(taxed);

            row.gross_salary += gross;
            row.roth_contributions += roth;
            row.salary_to_taxed_income += taxed;
        }
    }

    fn socsec_income(&self, state: &mut YearState, row: &mut YearSummary) {
        let year = state.year;
        let family = &self.policy.family;

        let highest = family
            .iter()
            .map(|(_, p)| p.annual_ss_benefit(year))
            .fold(0.0, f64::max);

        for (_, person) in family.iter().filter(|(_, p)| p.claiming_ss(year)) {
            let own = person.annual_ss_benefit(year);
            let collected = if person.waited_for_full_ss(year) {
                own.max(0.5 * highest)
            } else {
                own
            };

            if collected > own {
                log::debug!("{} earns 1/2 spouse's social security = ${:.0}", person, collected);
            } else {
                log::debug!("{} earns social security = ${:.0}", person, collected);
            }
            state.accounts.shared(Category::TaxedIncome).add(collected);
            row.social_security += collected;
        }
    }

    fn expenses(&self, state: &mut YearState, row: &mut YearSummary) {
        let year = state.year;
        let accounts = &mut state.accounts;

        let budget = self.policy.budget_expenses(year);
        log::debug!("budget expenses = ${:.0}", budget);
        accounts.shared(Category::Expenses).subtract(budget);
        row.budget_expenses = budget;

        let housing = self.policy.housing_expenses(year);
        log::debug!("housing expenses = ${:.0}", housing);
        accounts.shared(Category::Expenses).subtract(housing);
        row.housing_expenses = housing;

        for (_, person) in self.policy.family.iter() {
            let cost = self
                .policy
                .healthcare_expenses(year, person, &self.assumptions.healthcare);
            log::debug!("healthcare expenses for {} = ${:.0}", person, cost);
            accounts.shared(Category::Expenses).subtract(cost);
            row.healthcare_expenses += cost;
        }

        for adjustment in self.policy.one_time_adjustments(year) {
            log::debug!("{}: ${:.0} to {}", adjustment.label, adjustment.amount, adjustment.category);
            let account = accounts.shared(adjustment.category);
            if adjustment.amount >= 0.0 {
                account.add(adjustment.amount);
            } else {
                account.subtract(-adjustment.amount);
            }
            row.adjustments += adjustment.amount;
        }
    }

    fn required_minimum_distributions(&self, state: &mut YearState, row: &mut YearSummary) {
        for (id, person) in self.policy.family.iter() {
            let age = person.age(state.year);
            if age < RMD_START_AGE {
                continue;
            }

            let owner = Owner::Person(id);
            let balance = state.accounts.balance(Category::DeferredIra, owner);
            let rmd = match self.assumptions.rmd.calculate_rmd(balance, age) {
                Ok(rmd) => rmd,
                Err(e) => {
                    log::warn!("{}: {}; no RMD this year", person, e);
                    0.0
                }
            };

            if rmd > 0.0 {
                log::debug!("{} takes RMD of ${:.0}", person, rmd);
                state.accounts.transfer(
                    (Category::DeferredIra, owner),
                    (Category::IraWithdrawals, Owner::Household),
                    rmd,
                );
                row.rmd += rmd;
            }
        }
    }

    /// Convert only in years with no other taxed income
    fn roth_conversions(&self, state: &mut YearState, row: &mut YearSummary) {
        if state.accounts.shared_balance(Category::TaxedIncome) > 0.0 {
            return;
        }

        for (id, person) in self.policy.family.iter() {
            let owner = Owner::Person(id);
            let ira = state.accounts.balance(Category::DeferredIra, owner);
            let conversion = ira.min(self.config.roth_conversion_cap);
            if conversion <= 0.0 {
                continue;
            }

            log::debug!("Roth conversion ${:.0} from {}'s traditional IRA", conversion, person);
            state
                .accounts
                .transfer((Category::DeferredIra, owner), (Category::Roth, owner), conversion);
            // Taxable this year; the savings debit cancels out at the sweep
            state.accounts.shared(Category::IraWithdrawals).add(conversion);
            state.accounts.shared(Category::Savings).subtract(conversion);
            row.roth_conversions += conversion;
        }
    }

    fn voluntary_distributions(&self, state: &mut YearState, row: &mut YearSummary) {
        let year = state.year;
        let pct = self.policy.distribution_percentage(year);
        let why = format!("{}% voluntary distribution", pct);

        let already_ira = state.accounts.shared_balance(Category::IraWithdrawals);
        let target_ira = state.accounts.sum(&[Category::DeferredIra]) * pct / 100.0;
        let remaining = target_ira - already_ira;
        if remaining > 0.0 {
            row.ira_distributions = self.withdraw(
                &mut state.accounts,
                year,
                Category::DeferredIra,
                Category::IraWithdrawals,
                remaining,
                &why,
            );
        }

        // Roth money is untaxed and goes straight to savings
        let target_roth = state.accounts.sum(&[Category::Roth]) * pct / 100.0;
        if target_roth > 0.0 {
            row.roth_distributions = self.withdraw(
                &mut state.accounts,
                year,
                Category::Roth,
                Category::Savings,
                target_roth,
                &why,
            );
        }
    }

    fn calculate_taxes(&self, state: &mut YearState, row: &mut YearSummary) {
        let taxable = state.accounts.shared_balance(Category::TaxedIncome)
            + state.accounts.shared_balance(Category::IraWithdrawals);
        let status = if self.policy.family.is_married() {
            FilingStatus::MarriedJointly
        } else {
            FilingStatus::Single
        };
        let tax = self.assumptions.tax.estimate_income_tax(taxable, status);
        log::debug!("estimated tax ({:?}) on ${:.0} income is ${:.0}", status, taxable, tax);

        state.accounts.shared(Category::TaxOwed).subtract(tax);
        row.taxable_income = taxable;
        row.income_tax = tax;
    }

    /// Top savings up to the floor from the IRA, then the Roth
    fn ensure_minimum_savings(&self, state: &mut YearState, row: &mut YearSummary) -> YearOutcome {
        let year = state.year;
        let floor = self.policy.minimum_savings_balance(year);

        let savings = state.accounts.shared_balance(Category::Savings);
        if savings <= floor {
            let shortfall = floor - savings;
            log::debug!("savings came up short by ${:.0}", shortfall);
            row.shortfall_ira = self.withdraw(
                &mut state.accounts,
                year,
                Category::DeferredIra,
                Category::IraWithdrawals,
                shortfall,
                "savings shortfall",
            );
            // Land the IRA money in savings now; the sweep has already run
            row.swept += sweep_into_savings(&mut state.accounts);
        }

        let savings = state.accounts.shared_balance(Category::Savings);
        if savings <= floor {
            let shortfall = floor - savings;
            log::debug!("savings still short by ${:.0}", shortfall);
            row.shortfall_roth = self.withdraw(
                &mut state.accounts,
                year,
                Category::Roth,
                Category::Savings,
                shortfall,
                "savings shortfall",
            );
        }

        if state.accounts.shared_balance(Category::Savings) <= 0.0 {
            return YearOutcome::Insolvent { year };
        }
        YearOutcome::Solvent
    }

    fn apply_market(&self, state: &mut YearState, market: &mut MarketSampler<'_>, row: &mut YearSummary) {
        let draw = market.next_year();
        let factor = draw.real_growth_factor();
        log::debug!(
            "market return {:.2}%, inflation {:.2}%, growth factor {:.4}",
            draw.return_pct,
            draw.inflation_pct,
            factor
        );

        for account in state.accounts.persistent_accounts_mut() {
            account.grow(factor);
        }
        row.return_pct = draw.return_pct;
        row.inflation_pct = draw.inflation_pct;
    }

    fn record_balances(&self, state: &YearState, row: &mut YearSummary) {
        let accounts = &state.accounts;
        row.savings = accounts.sum(&[Category::Savings]);
        row.deferred_ira = accounts.sum(&[Category::DeferredIra]);
        row.roth = accounts.sum(&[Category::Roth]);
        row.net_worth = accounts.net_worth();

        let ages = self
            .policy
            .family
            .iter()
            .map(|(_, p)| format!("{}: {}", p, p.age(state.year)))
            .collect::<Vec<_>>()
            .join("  ");
        log::debug!("YEAR {}: {}  {}", state.year, ages, accounts.snapshot());
    }

    fn withdraw(
        &self,
        accounts: &mut Accounts,
        year: i32,
        source: Category,
        destination: Category,
        target: f64,
        why: &str,
    ) -> f64 {
        withdraw_proportionally(
            accounts,
            &self.policy.family,
            year,
            self.config.min_withdrawal_age,
            source,
            destination,
            target,
            why,
        )
    }
}

/// Zero every transient account
pub(super) fn reset_transients(accounts: &mut Accounts) {
    for account in accounts.perennial_accounts_mut() {
        account.clear();
    }
}

/// Move every transient balance into shared savings; returns the net amount
pub(super) fn sweep_into_savings(accounts: &mut Accounts) -> f64 {
    let mut moved = 0.0;
    for category in Category::TRANSIENT {
        let pending: Vec<(Owner, f64)> = accounts
            .perennial_accounts()
            .filter(|a| a.category() == category && a.balance() != 0.0)
            .map(|a| (a.owner(), a.balance()))
            .collect();

        for (owner, amount) in pending {
            log::debug!("sweeping ${:.0} from {} into savings", amount, category);
            accounts.transfer((category, owner), (Category::Savings, Owner::Household), amount);
            moved += amount;
        }
    }
    moved
}
