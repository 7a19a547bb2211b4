//! URL template catalog for the field, archive, news and international
//! strategies.
//!
//! Every host here resolves to a registry entry with authority of at least
//! 87, so an undated template candidate credited to its institution clears
//! the default credibility bar.

use super::template::UrlTemplate;
use crate::types::SourceKind::{Article, Book, Document, Url};

pub const SCIENTIFIC: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Nobel Prize laureate records",
        "https://www.nobelprize.org/search/?s={query}",
        "Nobel Foundation",
        Document,
    ),
    UrlTemplate::new(
        "{name} in Nature",
        "https://www.nature.com/search?q={terms}",
        "Springer Nature",
        Article,
    ),
    UrlTemplate::new(
        "{name} in Science",
        "https://www.science.org/action/doSearch?AllField={terms}",
        "American Association for the Advancement of Science",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Royal Society publications",
        "https://royalsocietypublishing.org/action/doSearch?AllField={query}",
        "The Royal Society",
        Article,
    ),
    UrlTemplate::new(
        "{name} - arXiv preprints",
        "https://arxiv.org/search/?query={query}&searchtype=all",
        "arXiv, Cornell University",
        Article,
    ),
    UrlTemplate::new(
        "{name} - PubMed Central",
        "https://www.ncbi.nlm.nih.gov/pmc/?term={terms}",
        "U.S. National Library of Medicine",
        Article,
    ),
    UrlTemplate::new(
        "{name} - MacTutor History of Mathematics",
        "https://mathshistory.st-andrews.ac.uk/Search/?query={query}",
        "University of St Andrews",
        Document,
    ),
    UrlTemplate::new(
        "{name} - NASA History",
        "https://history.nasa.gov/search.html?q={query}",
        "NASA History Office",
        Document,
    ),
];

pub const POLITICAL: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Miller Center",
        "https://millercenter.org/search?search={query}",
        "Miller Center, University of Virginia",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Office of the Historian",
        "https://history.state.gov/search?q={query}",
        "U.S. Department of State, Office of the Historian",
        Document,
    ),
    UrlTemplate::new(
        "{name} - United Nations Digital Library",
        "https://digitallibrary.un.org/search?p={query}",
        "United Nations",
        Document,
    ),
    UrlTemplate::new(
        "{name} - European Parliament archives",
        "https://www.europarl.europa.eu/search?q={query}",
        "European Parliament",
        Document,
    ),
];

pub const ARTISTIC: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - The Met Collection",
        "https://www.metmuseum.org/art/collection/search?q={query}",
        "The Metropolitan Museum of Art",
        Document,
    ),
    UrlTemplate::new(
        "{name} - MoMA",
        "https://www.moma.org/search?query={query}",
        "The Museum of Modern Art",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Getty Museum Collection",
        "https://www.getty.edu/art/collection/search?q={query}",
        "J. Paul Getty Trust",
        Document,
    ),
    UrlTemplate::new(
        "{name} - The National Gallery",
        "https://www.nationalgallery.org.uk/search?q={query}",
        "The National Gallery, London",
        Document,
    ),
    UrlTemplate::new(
        "{name} - National Gallery of Art",
        "https://www.nga.gov/collection-search-result.html?artist={query}",
        "National Gallery of Art, Washington",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Smithsonian collections",
        "https://collections.si.edu/search/results.htm?q={terms}",
        "Smithsonian Institution",
        Document,
    ),
];

pub const LITERARY: &[UrlTemplate] = &[
    UrlTemplate::new(
        "Works by {name} - Project Gutenberg",
        "https://www.gutenberg.org/ebooks/search/?query={query}",
        "Project Gutenberg",
        Book,
    ),
    UrlTemplate::new(
        "{name} - Poetry Foundation",
        "https://www.poetryfoundation.org/search?query={query}",
        "Poetry Foundation",
        Url,
    ),
    UrlTemplate::new(
        "{name} - Academy of American Poets",
        "https://poets.org/search?combine={query}",
        "Academy of American Poets",
        Url,
    ),
    UrlTemplate::new(
        "{name} manuscripts - Library of Congress",
        "https://www.loc.gov/manuscripts/?q={query}",
        "Library of Congress",
        Document,
    ),
    UrlTemplate::new(
        "{name} - British Library collections",
        "https://www.bl.uk/search?q={query}",
        "The British Library",
        Document,
    ),
];

pub const MILITARY: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - U.S. Army Center of Military History",
        "https://history.army.mil/search.html?q={query}",
        "U.S. Army Center of Military History",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Naval History and Heritage Command",
        "https://www.history.navy.mil/search.html?q={query}",
        "Naval History and Heritage Command",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Air Force Historical Support Division",
        "https://www.afhistory.af.mil/Search/?q={query}",
        "Air Force Historical Support Division",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Imperial War Museums",
        "https://www.iwm.org.uk/collections/search?query={query}",
        "Imperial War Museums",
        Document,
    ),
    UrlTemplate::new(
        "{name} - The National WWII Museum",
        "https://www.nationalww2museum.org/search?search_api_fulltext={query}",
        "The National WWII Museum",
        Url,
    ),
    UrlTemplate::new(
        "{name} - Australian War Memorial",
        "https://www.awm.gov.au/advanced-search?query={query}",
        "Australian War Memorial",
        Document,
    ),
];

pub const ACADEMIC: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Internet Archive texts",
        "https://archive.org/search?query={query}&mediatype=texts",
        "Internet Archive",
        Book,
    ),
    UrlTemplate::new(
        "{name} - JSTOR",
        "https://www.jstor.org/action/doBasicSearch?Query={terms}",
        "JSTOR, ITHAKA",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Google Scholar",
        "https://scholar.google.com/scholar?q={terms}",
        "Google Scholar",
        Article,
    ),
    UrlTemplate::new(
        "{name} - HOLLIS, Harvard Library",
        "https://hollis.harvard.edu/primo-explore/search?query=any,contains,{query}",
        "Harvard Library",
        Book,
    ),
    UrlTemplate::new(
        "{name} - SearchWorks, Stanford Libraries",
        "https://searchworks.stanford.edu/?q={query}",
        "Stanford Libraries",
        Book,
    ),
    UrlTemplate::new(
        "{name} - Cambridge Core",
        "https://www.cambridge.org/core/search?q={terms}",
        "Cambridge University Press",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Oxford Academic",
        "https://academic.oup.com/search-results?q={terms}",
        "Oxford University Press",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Project MUSE",
        "https://muse.jhu.edu/search?action=search&query=content:{query}",
        "Johns Hopkins University Press",
        Article,
    ),
];

pub const BIOGRAPHICAL: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Encyclopaedia Britannica",
        "https://www.britannica.com/search?query={query}",
        "Encyclopaedia Britannica",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Oxford Dictionary of National Biography",
        "https://www.oxforddnb.com/search?q={query}",
        "Oxford University Press",
        Article,
    ),
    UrlTemplate::new(
        "{name} - American National Biography",
        "https://www.anb.org/search?q={query}",
        "American Council of Learned Societies",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Biography",
        "https://www.biography.com/search?query={query}",
        "A&E Television Networks",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Smithsonian Magazine",
        "https://www.smithsonianmag.com/search/?q={query}",
        "Smithsonian Institution",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Internet Archive",
        "https://archive.org/search?query={query}",
        "Internet Archive",
        Document,
    ),
];

pub const NEWS: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - The New York Times archive",
        "https://www.nytimes.com/search?query={query}",
        "The New York Times",
        Article,
    ),
    UrlTemplate::new(
        "{name} - The Guardian",
        "https://www.theguardian.com/search?q={query}",
        "Guardian News & Media",
        Article,
    ),
    UrlTemplate::new(
        "{name} - BBC",
        "https://www.bbc.co.uk/search?q={query}",
        "British Broadcasting Corporation",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Reuters",
        "https://www.reuters.com/site-search/?query={query}",
        "Reuters",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Associated Press",
        "https://apnews.com/search?q={query}",
        "The Associated Press",
        Article,
    ),
    UrlTemplate::new(
        "{name} - The Washington Post",
        "https://www.washingtonpost.com/search/?query={query}",
        "The Washington Post",
        Article,
    ),
    UrlTemplate::new(
        "{name} - TIME",
        "https://time.com/search/?q={query}",
        "TIME USA",
        Article,
    ),
    UrlTemplate::new(
        "{name} - Chronicling America",
        "https://chroniclingamerica.loc.gov/search/pages/results/?andtext={query}",
        "Library of Congress",
        Document,
    ),
];

pub const INTERNATIONAL: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - UNESCO",
        "https://www.unesco.org/en/search?text={query}",
        "UNESCO",
        Document,
    ),
    UrlTemplate::new(
        "{name} - UNESDOC digital library",
        "https://unesdoc.unesco.org/search/?q={terms}",
        "UNESCO",
        Document,
    ),
    UrlTemplate::new(
        "{name} - United Nations",
        "https://www.un.org/en/search?query={query}",
        "United Nations",
        Document,
    ),
];

/// Country whose national institutions are queried for government records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nation {
    UnitedStates,
    UnitedKingdom,
    Germany,
    France,
    Canada,
    Australia,
    /// Known nationality without dedicated archive templates
    Other,
}

impl Nation {
    /// Resolve a free-form nationality ("German-American", "British").
    ///
    /// Returns `None` when no nationality is known.
    pub fn detect(nationality: Option<&str>) -> Option<Self> {
        let text = nationality?.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        let words: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric() && c != '.')
            .filter(|w| !w.is_empty())
            .collect();
        let has = |needles: &[&str]| {
            needles.iter().any(|n| {
                if n.contains(' ') {
                    text.contains(n)
                } else {
                    words.iter().any(|w| w == n)
                }
            })
        };

        let nation = if has(&["american", "us", "u.s.", "usa", "united states"]) {
            Nation::UnitedStates
        } else if has(&["british", "english", "scottish", "welsh", "uk", "united kingdom"]) {
            Nation::UnitedKingdom
        } else if has(&["german", "prussian", "germany"]) {
            Nation::Germany
        } else if has(&["french", "france"]) {
            Nation::France
        } else if has(&["canadian", "canada"]) {
            Nation::Canada
        } else if has(&["australian", "australia"]) {
            Nation::Australia
        } else {
            Nation::Other
        };
        Some(nation)
    }

    /// National archive and biography templates.
    pub fn archives(&self) -> &'static [UrlTemplate] {
        match self {
            Nation::UnitedStates => US_ARCHIVES,
            Nation::UnitedKingdom => UK_ARCHIVES,
            Nation::Germany => GERMAN_ARCHIVES,
            Nation::France => FRENCH_ARCHIVES,
            Nation::Canada => CANADIAN_ARCHIVES,
            Nation::Australia => AUSTRALIAN_ARCHIVES,
            Nation::Other => INTERNATIONAL_ARCHIVES,
        }
    }

    /// Legislature and head-of-state records, for political figures.
    pub fn legislature(&self) -> &'static [UrlTemplate] {
        match self {
            Nation::UnitedStates => US_LEGISLATURE,
            Nation::UnitedKingdom => UK_LEGISLATURE,
            Nation::Germany => GERMAN_LEGISLATURE,
            _ => &[],
        }
    }
}

const US_ARCHIVES: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - National Archives Catalog",
        "https://catalog.archives.gov/search?q={query}",
        "U.S. National Archives and Records Administration",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Library of Congress",
        "https://www.loc.gov/search/?q={query}",
        "Library of Congress",
        Document,
    ),
    UrlTemplate::new(
        "{name} - National Park Service",
        "https://www.nps.gov/search/?query={query}",
        "U.S. National Park Service",
        Document,
    ),
];

const UK_ARCHIVES: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - The National Archives Discovery",
        "https://discovery.nationalarchives.gov.uk/results/r?_q={query}",
        "The National Archives (UK)",
        Document,
    ),
    UrlTemplate::new(
        "{name} - British Library",
        "https://explore.bl.uk/search?q={query}",
        "The British Library",
        Document,
    ),
];

const GERMAN_ARCHIVES: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Bundesarchiv",
        "https://invenio.bundesarchiv.de/invenio/suche?q={query}",
        "Bundesarchiv",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Deutsche Biographie",
        "https://www.deutsche-biographie.de/search?name={query}",
        "Historische Kommission bei der Bayerischen Akademie der Wissenschaften",
        Article,
    ),
];

const FRENCH_ARCHIVES: &[UrlTemplate] = &[UrlTemplate::new(
    "{name} - Archives nationales",
    "https://www.siv.archives-nationales.culture.gouv.fr/siv/rechercheconsultation/consultation/ir/resultats.action?q={query}",
    "Archives nationales de France",
    Document,
)];

const CANADIAN_ARCHIVES: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Library and Archives Canada",
        "https://recherche-collection-search.bac-lac.gc.ca/eng/Home/Result?q_any={query}",
        "Library and Archives Canada",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Dictionary of Canadian Biography",
        "http://www.biographi.ca/en/results.php?ft={query}",
        "University of Toronto / Université Laval",
        Article,
    ),
];

const AUSTRALIAN_ARCHIVES: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - National Archives of Australia",
        "https://recordsearch.naa.gov.au/SearchNRetrieve/Interface/SearchScreens/BasicSearch.aspx?keyword={query}",
        "National Archives of Australia",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Australian Dictionary of Biography",
        "https://adb.anu.edu.au/biographies/search/?query={query}",
        "Australian National University",
        Article,
    ),
];

const INTERNATIONAL_ARCHIVES: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - Library of Congress",
        "https://www.loc.gov/search/?q={query}",
        "Library of Congress",
        Document,
    ),
    UrlTemplate::new(
        "{name} - Smithsonian Institution",
        "https://www.si.edu/search?edan_q={query}",
        "Smithsonian Institution",
        Document,
    ),
];

const US_LEGISLATURE: &[UrlTemplate] = &[
    UrlTemplate::new(
        "{name} - U.S. Senate historical office",
        "https://www.senate.gov/search/index.htm?q={query}",
        "United States Senate",
        Document,
    ),
    UrlTemplate::new(
        "{name} - History, Art & Archives, U.S. House",
        "https://history.house.gov/Search?Term={query}",
        "U.S. House of Representatives",
        Document,
    ),
    UrlTemplate::new(
        "{name} - The White House",
        "https://www.whitehouse.gov/?s={query}",
        "The White House",
        Document,
    ),
];

const UK_LEGISLATURE: &[UrlTemplate] = &[UrlTemplate::new(
    "{name} - UK Parliament",
    "https://www.parliament.uk/search/results/?q={query}",
    "UK Parliament",
    Document,
)];

const GERMAN_LEGISLATURE: &[UrlTemplate] = &[UrlTemplate::new(
    "{name} - Deutscher Bundestag",
    "https://www.bundestag.de/suche?suchbegriff={query}",
    "Deutscher Bundestag",
    Document,
)];
