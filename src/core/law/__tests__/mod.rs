mod quanta_law_test;
