use crate::core::balance::Balances;
use crate::core::expense::Expense;
use crate::core::member::Member;
use crate::error::Result;
use log::debug;

/// Reduces a group's expense list into per-member net balances.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute the net balance of every member.
    ///
    /// # Algorithm
    ///
    /// 1. Start every member in the snapshot at exactly zero, in snapshot order.
    /// 2. For each expense, credit every creditor with the amount they paid.
    /// 3. Debit every debtor with `total_amount / count(debtors)`, computed
    ///    once per expense.
    ///
    /// Members without any activity stay in the result at zero. The result
    /// sums to zero up to the residual of uneven splits.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidExpense` if an expense has no debtors or its
    ///   credits do not add up to its total.
    /// - `LedgerError::UnknownMember` if an expense references a member
    ///   that is not in `members`. Nothing is returned partially.
    /// - `LedgerError::AmountOverflow` if a member's running balance leaves
    ///   the decimal range.
    pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Result<Balances> {
        let mut balances = Balances::with_members(members.iter().map(Member::id));

        for expense in expenses {
            expense.validate()?;
            Self::apply_expense(&mut balances, expense)?;
        }

        match balances.sum() {
            Ok(residual) => debug!(
                "Aggregated {} expenses over {} members (residual {})",
                expenses.len(),
                balances.len(),
                residual
            ),
            Err(_) => debug!(
                "Aggregated {} expenses over {} members (residual out of range)",
                expenses.len(),
                balances.len()
            ),
        }
        Ok(balances)
    }

    fn apply_expense(balances: &mut Balances, expense: &Expense) -> Result<()> {
        for share in expense.creditors() {
            balances.credit(share.member, share.amount)?;
        }

        let share = expense.share_per_debtor();
        for &debtor in expense.debtors() {
            balances.debit(debtor, share)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::{CreditorShare, ExpenseId};
    use crate::core::group::GroupId;
    use crate::core::member::MemberId;
    use crate::error::LedgerError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn make_members(group: GroupId, names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Member::new(MemberId::new(i as u64 + 1), *name, group))
            .collect()
    }

    fn expense(
        group: GroupId,
        total: Decimal,
        creditors: Vec<(MemberId, Decimal)>,
        debtors: Vec<MemberId>,
    ) -> Expense {
        Expense::new(
            ExpenseId::new(1),
            group,
            "expense",
            total,
            creditors
                .into_iter()
                .map(|(m, a)| CreditorShare::new(m, a))
                .collect(),
            debtors,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_group_balances_are_zero() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob"]);
        let balances = BalanceAggregator::compute_balances(&members, &[]).unwrap();
        assert_eq!(balances.len(), 2);
        assert!(balances.iter().all(|(_, b)| b == Decimal::ZERO));
    }

    #[test]
    fn test_one_creditor_one_debtor() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob"]);
        let (alice, bob) = (members[0].id(), members[1].id());
        let taxi = expense(group, dec!(60), vec![(alice, dec!(60))], vec![bob]);

        let balances = BalanceAggregator::compute_balances(&members, &[taxi]).unwrap();
        assert_eq!(balances.get(alice), Some(dec!(60)));
        assert_eq!(balances.get(bob), Some(dec!(-60)));
    }

    #[test]
    fn test_even_three_way_split() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob", "carol"]);
        let (alice, bob, carol) = (members[0].id(), members[1].id(), members[2].id());
        let pizza = expense(group, dec!(90), vec![(alice, dec!(90))], vec![alice, bob, carol]);

        let balances = BalanceAggregator::compute_balances(&members, &[pizza]).unwrap();
        assert_eq!(balances.get(alice), Some(dec!(60)));
        assert_eq!(balances.get(bob), Some(dec!(-30)));
        assert_eq!(balances.get(carol), Some(dec!(-30)));
    }

    #[test]
    fn test_multiple_creditors_multiple_debtors() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob", "carol", "dave"]);
        let ids: Vec<MemberId> = members.iter().map(Member::id).collect();
        let pizza = expense(
            group,
            dec!(90),
            vec![(ids[0], dec!(30)), (ids[1], dec!(60))],
            ids.clone(),
        );

        let balances = BalanceAggregator::compute_balances(&members, &[pizza]).unwrap();
        assert_eq!(balances.get(ids[0]), Some(dec!(7.5)));
        assert_eq!(balances.get(ids[1]), Some(dec!(37.5)));
        assert_eq!(balances.get(ids[2]), Some(dec!(-22.5)));
        assert_eq!(balances.get(ids[3]), Some(dec!(-22.5)));
    }

    #[test]
    fn test_unknown_debtor_fails_whole_computation() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob"]);
        let stranger = MemberId::new(42);
        let lunch = expense(
            group,
            dec!(20),
            vec![(members[0].id(), dec!(20))],
            vec![members[1].id(), stranger],
        );

        let result = BalanceAggregator::compute_balances(&members, &[lunch]);
        assert_eq!(result, Err(LedgerError::UnknownMember(stranger)));
    }

    #[test]
    fn test_unknown_creditor_fails() {
        let group = GroupId::new();
        let members = make_members(group, &["alice"]);
        let stranger = MemberId::new(42);
        let lunch = expense(group, dec!(20), vec![(stranger, dec!(20))], vec![members[0].id()]);

        let result = BalanceAggregator::compute_balances(&members, &[lunch]);
        assert_eq!(result, Err(LedgerError::UnknownMember(stranger)));
    }

    #[test]
    fn test_expenses_accumulate() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob"]);
        let (alice, bob) = (members[0].id(), members[1].id());
        let first = expense(group, dec!(50), vec![(alice, dec!(50))], vec![alice, bob]);
        let second = expense(group, dec!(30), vec![(bob, dec!(30))], vec![alice, bob]);

        let balances = BalanceAggregator::compute_balances(&members, &[first, second]).unwrap();
        assert_eq!(balances.get(alice), Some(dec!(10)));
        assert_eq!(balances.get(bob), Some(dec!(-10)));
    }

    #[test]
    fn test_uneven_split_is_nearly_zero_sum() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob", "carol"]);
        let ids: Vec<MemberId> = members.iter().map(Member::id).collect();
        let dinner = expense(group, dec!(100), vec![(ids[0], dec!(100))], ids.clone());

        let balances = BalanceAggregator::compute_balances(&members, &[dinner]).unwrap();
        assert!(balances.is_balanced(dec!(0.000000001)));
        // Every debtor gets the identical share.
        assert_eq!(balances.get(ids[1]), balances.get(ids[2]));
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let group = GroupId::new();
        let members = make_members(group, &["alice", "bob"]);
        let (alice, bob) = (members[0].id(), members[1].id());
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let first = expense(group, huge, vec![(alice, huge)], vec![bob]);
        let second = expense(group, huge, vec![(alice, huge)], vec![bob]);

        let result = BalanceAggregator::compute_balances(&members, &[first, second]);
        assert!(matches!(result, Err(LedgerError::AmountOverflow { .. })));
    }
}
