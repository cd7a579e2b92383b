//! Property tests over random operation sequences
//!
//! Conservation: every unit of A and B is either held by the pool or by
//! one of the two accounts, whatever sequence of groups was accepted.

use lib_pool::{AssetParams, CallArgs, Group, MemoryLedger, PoolConfig, PoolEngine, SubOperation};
use lib_types::{Address, Amount, AssetId};
use proptest::prelude::*;

const APP_ID: u64 = 55;
const ASSET_TOTAL: Amount = 1_000_000_000;

fn creator() -> Address {
    Address::new([1u8; 32])
}

fn trader() -> Address {
    Address::new([2u8; 32])
}

#[derive(Debug, Clone)]
enum Op {
    Swap { a_side: bool, amount: Amount },
    Mint { a_amount: Amount, b_amount: Amount },
    Burn { amount: Amount },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 1u64..50_000).prop_map(|(a_side, amount)| Op::Swap { a_side, amount }),
        (1u64..50_000, 1u64..50_000)
            .prop_map(|(a_amount, b_amount)| Op::Mint { a_amount, b_amount }),
        (1u64..5_000).prop_map(|amount| Op::Burn { amount }),
    ]
}

fn setup() -> (MemoryLedger, PoolEngine, AssetId, AssetId) {
    let mut ledger = MemoryLedger::new();
    let mut assets = Vec::new();
    for unit in ["ALP", "BET"] {
        let id = ledger.create_asset(
            creator(),
            AssetParams {
                name: unit.to_string(),
                unit_name: unit.to_string(),
                total: ASSET_TOTAL,
                decimals: 0,
                manager: creator(),
                reserve: creator(),
            },
        );
        ledger.opt_in(trader(), id).unwrap();
        ledger.transfer(creator(), trader(), id, ASSET_TOTAL / 2).unwrap();
        assets.push(id);
    }
    let (a, b) = (assets[0], assets[1]);

    let mut engine = PoolEngine::deploy(PoolConfig::new(a, b).unwrap(), APP_ID, creator()).unwrap();
    let boot = Group::new(vec![SubOperation::app_call(
        creator(),
        APP_ID,
        CallArgs::bootstrap(a, b).encode(),
    )]);
    ledger.submit_group(&mut engine, &boot).unwrap();

    let pool = engine.pool_asset().unwrap();
    ledger.opt_in(creator(), pool).unwrap();
    ledger.opt_in(trader(), pool).unwrap();

    let app = engine.app_address();
    let fund = Group::new(vec![
        SubOperation::app_call(creator(), APP_ID, CallArgs::fund(pool, a, b).encode()),
        SubOperation::transfer(creator(), app, a, 100_000),
        SubOperation::transfer(creator(), app, b, 300_000),
    ]);
    ledger.submit_group(&mut engine, &fund).unwrap();

    (ledger, engine, a, b)
}

fn group_for(op: &Op, engine: &PoolEngine, a: AssetId, b: AssetId) -> Group {
    let app = engine.app_address();
    let pool = engine.pool_asset().unwrap_or_default();
    let (args, deposits) = match *op {
        Op::Swap { a_side, amount } => {
            let input = if a_side { a } else { b };
            (CallArgs::swap(a, b), vec![SubOperation::transfer(trader(), app, input, amount)])
        }
        Op::Mint { a_amount, b_amount } => (
            CallArgs::mint(pool, a, b),
            vec![
                SubOperation::transfer(trader(), app, a, a_amount),
                SubOperation::transfer(trader(), app, b, b_amount),
            ],
        ),
        Op::Burn { amount } => (
            CallArgs::burn(pool, a, b),
            vec![SubOperation::transfer(trader(), app, pool, amount)],
        ),
    };

    let mut ops = vec![SubOperation::app_call(trader(), APP_ID, args.encode())];
    ops.extend(deposits);
    Group::new(ops)
}

proptest! {
    #[test]
    fn prop_reserve_assets_are_conserved(ops in prop::collection::vec(op_strategy(), 1..20)) {
        let (mut ledger, mut engine, a, b) = setup();
        let app = engine.app_address();

        for op in &ops {
            let group = group_for(op, &engine, a, b);
            let before = ledger.clone();
            if ledger.submit_group(&mut engine, &group).is_err() {
                // Rejected groups leave every balance untouched
                for asset in [a, b] {
                    for owner in [app, creator(), trader()] {
                        prop_assert_eq!(
                            ledger.balance(&owner, asset),
                            before.balance(&owner, asset)
                        );
                    }
                }
            }

            for asset in [a, b] {
                let held = ledger.balance(&app, asset)
                    + ledger.balance(&creator(), asset)
                    + ledger.balance(&trader(), asset);
                prop_assert_eq!(held, ASSET_TOTAL);
            }
        }
    }

    #[test]
    fn prop_accepted_swaps_grow_reserve_product(
        swaps in prop::collection::vec((any::<bool>(), 1u64..50_000), 1..20)
    ) {
        let (mut ledger, mut engine, a, b) = setup();
        let app = engine.app_address();
        let product = |ledger: &MemoryLedger| {
            ledger.balance(&app, a) as u128 * ledger.balance(&app, b) as u128
        };

        let mut last = product(&ledger);
        for (a_side, amount) in swaps {
            let group = group_for(&Op::Swap { a_side, amount }, &engine, a, b);
            ledger.submit_group(&mut engine, &group).unwrap();
            let next = product(&ledger);
            prop_assert!(next > last);
            last = next;
        }
    }
}
