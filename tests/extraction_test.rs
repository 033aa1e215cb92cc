//! Extractor tests against static HTML fixtures covering the selector
//! fallback chains and the tiered product-URL policy.

use shoplens::sources::{amazon, flipkart};

#[test]
fn amazon_canonical_dp_link_wins_and_query_is_stripped() {
    let html = r#"
    <html><body>
      <div data-component-type="s-search-result" data-asin="B0BWQM5WHC">
        <h2><a href="/HP-15s/dp/B0BWQM5WHC/ref=sr_1_1?qid=171"><span>HP Laptop 15s 12th Gen Intel Core i5 8GB RAM 512GB SSD</span></a></h2>
        <span class="a-price"><span class="a-offscreen">₹45,990</span></span>
        <img class="s-image" src="https://m.media-amazon.com/images/I/71x.jpg"/>
      </div>
    </body></html>"#;

    let results = amazon::parse_results(html, 10, "amazon.in");
    assert_eq!(results.len(), 1);
    let p = &results[0];
    assert!(p.name.starts_with("HP Laptop 15s"));
    assert_eq!(p.price_display.as_deref(), Some("₹45,990"));
    assert_eq!(p.price_numeric, Some(45990.0));
    assert_eq!(
        p.product_url.as_deref(),
        Some("https://www.amazon.in/HP-15s/dp/B0BWQM5WHC/ref=sr_1_1")
    );
    assert_eq!(
        p.image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/71x.jpg")
    );
}

#[test]
fn amazon_asin_construction_when_no_canonical_link() {
    // Only a sponsored redirect and a placeholder link; the data-asin
    // attribute is the only trustworthy URL source.
    let html = r##"
    <div data-component-type="s-search-result" data-asin="B09TEST42">
      <h2><a href="/sspa/click?ie=UTF8&spc=xyz"><span>Dell Inspiron 3520 Laptop</span></a></h2>
      <a class="a-link-normal" href="#"></a>
      <span class="a-price"><span class="a-offscreen">₹42,990</span></span>
    </div>"##;

    let results = amazon::parse_results(html, 10, "amazon.in");
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].product_url.as_deref(),
        Some("https://www.amazon.in/dp/B09TEST42")
    );
}

#[test]
fn amazon_whole_and_fraction_prices_combine() {
    let html = r#"
    <div data-component-type="s-search-result" data-asin="B08USD">
      <h2><a href="/dp/B08USD"><span>MacBook Air M2 Laptop</span></a></h2>
      <span class="a-price">
        <span class="a-price-whole">1,299</span>
        <span class="a-price-fraction">99</span>
      </span>
    </div>"#;

    let results = amazon::parse_results(html, 10, "amazon.com");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].price_numeric, Some(1299.99));
    assert_eq!(results[0].price_display.as_deref(), Some("$1,299.99"));
}

#[test]
fn amazon_container_without_price_is_dropped() {
    let html = r#"
    <div data-component-type="s-search-result" data-asin="B0NOPRICE">
      <h2><a href="/dp/B0NOPRICE"><span>Mystery Gadget</span></a></h2>
    </div>
    <div data-component-type="s-search-result" data-asin="B0OK">
      <h2><a href="/dp/B0OK"><span>Real Gadget</span></a></h2>
      <span class="a-price"><span class="a-offscreen">₹999</span></span>
    </div>"#;

    let results = amazon::parse_results(html, 10, "amazon.in");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Real Gadget");
}

#[test]
fn amazon_fallback_container_selector_kicks_in() {
    // No s-search-result markers at all; div[data-asin] is the last tier.
    let html = r#"
    <div data-asin="B0LEGACY1">
      <h2><span>Legacy Layout Laptop</span></h2>
      <span class="a-price"><span class="a-offscreen">₹39,990</span></span>
    </div>"#;

    let results = amazon::parse_results(html, 10, "amazon.in");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Legacy Layout Laptop");
    assert_eq!(
        results[0].product_url.as_deref(),
        Some("https://www.amazon.in/dp/B0LEGACY1")
    );
}

#[test]
fn amazon_respects_max_results() {
    let mut html = String::new();
    for i in 0..8 {
        html.push_str(&format!(
            r#"<div data-component-type="s-search-result" data-asin="B{i}">
               <h2><a href="/dp/B{i}"><span>Laptop number {i}</span></a></h2>
               <span class="a-price"><span class="a-offscreen">₹10,000</span></span>
             </div>"#
        ));
    }
    let results = amazon::parse_results(&html, 3, "amazon.in");
    assert_eq!(results.len(), 3);
}

#[test]
fn flipkart_title_attribute_and_listed_price() {
    let html = r#"
    <div class="_13oc-S" data-id="MOBGTEST99">
      <a title="Samsung Galaxy M36 5G (Velvet Black, 128 GB)" href="/samsung-galaxy-m36-5g/p/itmtest?pid=MOBGTEST99&lid=x">link</a>
      <div class="_30jeq3">₹17,499</div>
      <img src="//rukminim2.flixcart.com/image/312/312/m36.jpg"/>
      <ul class="_1xgFaf"><li>6 GB RAM | 128 GB ROM</li><li>50MP Camera</li></ul>
    </div>"#;

    let results = flipkart::parse_results(html, 10);
    assert_eq!(results.len(), 1);
    let p = &results[0];
    assert!(p.name.starts_with("Samsung Galaxy M36 5G"));
    assert_eq!(p.price_display.as_deref(), Some("₹17,499"));
    assert_eq!(p.price_numeric, Some(17499.0));
    assert_eq!(
        p.product_url.as_deref(),
        Some("https://www.flipkart.com/samsung-galaxy-m36-5g/p/itmtest")
    );
    assert_eq!(
        p.image_url.as_deref(),
        Some("https://rukminim2.flixcart.com/image/312/312/m36.jpg")
    );
    assert_eq!(p.specifications.len(), 2);
}

#[test]
fn flipkart_pid_url_construction_when_links_unusable() {
    let html = r#"
    <div class="_13oc-S" data-id="LAPTOPPID1">
      <div class="_4rR01T">Lenovo IdeaPad Slim 3 Laptop</div>
      <div class="_30jeq3">₹38,990</div>
    </div>"#;

    let results = flipkart::parse_results(html, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].product_url.as_deref(),
        Some("https://www.flipkart.com/product/p/itm?pid=LAPTOPPID1")
    );
}

#[test]
fn flipkart_short_titles_are_rejected_as_noise() {
    let html = r#"
    <div class="_13oc-S" data-id="X">
      <a title="Ad" href="/p/itm1">x</a>
      <div class="_30jeq3">₹99</div>
    </div>"#;

    // "Ad" fails the length gate and no other name selector matches.
    let results = flipkart::parse_results(html, 10);
    assert!(results.is_empty());
}
