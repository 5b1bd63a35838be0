//! Search proxy implementation.
//!
//! Runs a raw query against the index and, for an identified customer, reprices
//! every hit:
//!
//! 1. Memberships, customer price adjustments and the index query are fetched
//!    concurrently.
//! 2. Hits from suppliers the customer is not a member of are dropped.
//! 3. Group price adjustments are fetched concurrently, one request per supplier,
//!    for the hits whose price the customer adjustment does not override.
//! 4. Each remaining hit gets its resolved price; every other field is untouched.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, error, info, instrument};

use crate::errors::SearchError;
use crate::processor::PriceAdjustments;
use orderable_search_repository::{
    CustomerProvider, GroupAdjustmentQuery, SearchIndexService, SupplierProvider, UpstreamError,
};
use orderable_search_shared::{
    CustomerPriceAdjustment, GroupPriceAdjustment, Membership, SearchDocument, SearchHits,
};

/// Prices search results for the customer asking.
pub struct SearchProxy {
    index: Arc<SearchIndexService>,
    customers: Arc<dyn CustomerProvider>,
    suppliers: Arc<dyn SupplierProvider>,
}

/// A hit that survived the membership filter.
struct MemberHit<'a> {
    hit: SearchDocument,
    membership: &'a Membership,
    customer_adjustment: Option<&'a CustomerPriceAdjustment>,
}

/// The hits of one supplier that need that supplier's group adjustments.
struct SupplierGroup<'a> {
    membership: &'a Membership,
    linked_product_ids: Vec<String>,
}

impl SearchProxy {
    pub fn new(
        index: Arc<SearchIndexService>,
        customers: Arc<dyn CustomerProvider>,
        suppliers: Arc<dyn SupplierProvider>,
    ) -> Self {
        Self {
            index,
            customers,
            suppliers,
        }
    }

    /// Run `raw_query` and price the hits for `customer_id` as of `as_of`.
    ///
    /// Without a customer the index response is returned untouched. With one, hits
    /// keep their index order minus those of suppliers the customer is not a member
    /// of, and any response metadata besides `hits` is passed through.
    #[instrument(skip(self, raw_query), fields(query_bytes = raw_query.len()))]
    pub async fn query(
        &self,
        raw_query: &[u8],
        customer_id: Option<&str>,
        as_of: DateTime<Utc>,
    ) -> Result<SearchHits, SearchError> {
        let customer_id = match customer_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                debug!("Anonymous search, returning index response as is");
                return Ok(self.index.query(raw_query).await?);
            }
        };

        let (memberships, customer_adjustments, results) = tokio::join!(
            self.customers.memberships(customer_id),
            self.customers.price_adjustments(customer_id, &as_of),
            self.index.query(raw_query),
        );
        let memberships = memberships.map_err(log_upstream)?;
        let customer_adjustments = customer_adjustments.map_err(log_upstream)?;
        let SearchHits { hits, extra } = results.map_err(log_upstream)?;

        let hit_count = hits.len();
        let member_hits = select_member_hits(hits, &memberships, &customer_adjustments)?;
        let groups = groups_to_fetch(&member_hits);

        let group_adjustments = self.fetch_group_adjustments(&groups, as_of).await?;

        let mut priced = Vec::with_capacity(member_hits.len());
        for member_hit in member_hits {
            priced.push(price_hit(member_hit, &group_adjustments)?);
        }

        info!(
            hit_count,
            priced_count = priced.len(),
            supplier_groups = groups.len(),
            "Priced search results"
        );

        Ok(SearchHits {
            hits: priced,
            extra,
        })
    }

    async fn fetch_group_adjustments(
        &self,
        groups: &[SupplierGroup<'_>],
        as_of: DateTime<Utc>,
    ) -> Result<Vec<GroupPriceAdjustment>, SearchError> {
        let queries: Vec<GroupAdjustmentQuery> = groups
            .iter()
            .map(|group| GroupAdjustmentQuery {
                supplier_id: group.membership.supplier_id.clone(),
                price_adjustment_group_id: group.membership.price_adjustment_group_id.clone(),
                as_of,
                linked_product_ids: group.linked_product_ids.clone(),
            })
            .collect();

        let results = join_all(
            queries
                .iter()
                .map(|query| self.suppliers.group_price_adjustments(query)),
        )
        .await;

        let mut adjustments = Vec::new();
        for result in results {
            adjustments.extend(result.map_err(log_upstream)?);
        }
        Ok(adjustments)
    }
}

fn log_upstream(err: UpstreamError) -> SearchError {
    error!(error = %err, "Search upstream call failed");
    SearchError::Upstream(err)
}

/// Drop hits from suppliers the customer is not a member of and attach the
/// membership and customer adjustment of the rest.
///
/// Rejects a hit that has to be priced from its base price but has none.
fn select_member_hits<'a>(
    hits: Vec<SearchDocument>,
    memberships: &'a [Membership],
    customer_adjustments: &'a [CustomerPriceAdjustment],
) -> Result<Vec<MemberHit<'a>>, SearchError> {
    let mut by_supplier: HashMap<&str, &Membership> = HashMap::new();
    for membership in memberships {
        by_supplier
            .entry(membership.supplier_id.as_str())
            .or_insert(membership);
    }

    let mut member_hits = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(membership) = hit.supplier_id().and_then(|id| by_supplier.get(id).copied())
        else {
            debug!(object_id = %hit.object_id, "Hit from non-member supplier excluded");
            continue;
        };

        let customer_adjustment = customer_adjustments
            .iter()
            .find(|a| a.applies_to(&hit.object_id, &membership.id));
        let overridden = customer_adjustment.is_some_and(|a| a.adjustment().is_override());

        if !overridden && hit.price().is_none() {
            return Err(SearchError::malformed_hit(
                hit.object_id.clone(),
                "price is missing or not a number",
            ));
        }

        member_hits.push(MemberHit {
            hit,
            membership,
            customer_adjustment,
        });
    }
    Ok(member_hits)
}

/// Group the hits still needing group adjustments by supplier, in first-seen order.
fn groups_to_fetch<'a>(member_hits: &[MemberHit<'a>]) -> Vec<SupplierGroup<'a>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SupplierGroup<'a>> = Vec::new();

    for member_hit in member_hits {
        if member_hit
            .customer_adjustment
            .is_some_and(|a| a.adjustment().is_override())
        {
            continue;
        }

        let membership = member_hit.membership;
        let position = *positions
            .entry(membership.supplier_id.as_str())
            .or_insert_with(|| {
                groups.push(SupplierGroup {
                    membership,
                    linked_product_ids: Vec::new(),
                });
                groups.len() - 1
            });
        groups[position]
            .linked_product_ids
            .push(member_hit.hit.object_id.clone());
    }
    groups
}

fn price_hit(
    member_hit: MemberHit<'_>,
    group_adjustments: &[GroupPriceAdjustment],
) -> Result<SearchDocument, SearchError> {
    let MemberHit {
        mut hit,
        membership,
        customer_adjustment,
    } = member_hit;

    let group_adjustment = group_adjustments
        .iter()
        .find(|a| a.applies_to(&hit.object_id, &membership.price_adjustment_group_id));

    let adjustments = PriceAdjustments::new(
        customer_adjustment.map(CustomerPriceAdjustment::adjustment),
        group_adjustment.map(GroupPriceAdjustment::adjustment),
    );

    let price = match (hit.price(), customer_adjustment) {
        (Some(base_price), _) => adjustments.resolve(base_price),
        (None, Some(adjustment)) if adjustments.is_customer_override() => adjustment.amount,
        (None, _) => {
            return Err(SearchError::malformed_hit(
                hit.object_id.clone(),
                "price is missing or not a number",
            ))
        }
    };

    hit.set_price(price);
    Ok(hit)
}
